mod devregs;
mod svd;
