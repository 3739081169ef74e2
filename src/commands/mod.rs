pub mod convert;

pub use convert::ConvertCommand;
