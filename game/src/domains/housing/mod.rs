pub use access_list::*;
pub use domain::*;

mod access_list;
mod domain;
