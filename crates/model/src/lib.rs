pub use serde_with;

pub mod feature;
pub mod fix;
pub mod query;
pub mod window;

pub trait ExampleData {
    fn example_data() -> Self;
}
