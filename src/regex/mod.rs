// Pattern caching shared by the scanners

mod cache;
