pub mod builtins;
pub mod environment;
pub mod value;

pub mod prelude {
    pub use super::{
        builtins::*,
        environment::*,
        value::*
    };
}
