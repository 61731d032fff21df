pub use attributes::*;
pub use decoder::*;
pub use encoder::*;
pub use error::*;
pub use schema::*;
pub use serializer::*;
pub use stream::*;

mod attributes;
mod decoder;
mod encoder;
mod error;
mod houses;
mod schema;
mod serializer;
mod stream;
