mod collector;

mod traits;
pub use traits::*;

mod types;
pub use types::*;

mod downloader;
pub use downloader::*;

mod processor;
pub use processor::*;

#[cfg(test)]
mod mocks;


#[cfg(test)]
mod downloader_tests;
