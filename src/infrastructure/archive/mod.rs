//! Archive builder implementations

mod zip;

pub use self::zip::ZipArchiveBuilder;
