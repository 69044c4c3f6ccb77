mod kv;

pub use kv::*;
