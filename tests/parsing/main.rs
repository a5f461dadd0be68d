mod extraction;
mod samples;
