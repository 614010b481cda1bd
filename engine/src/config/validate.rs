use std::fmt::Display;

pub trait Validate {
    type Error: Display;

    fn validate(&self) -> Result<(), Self::Error>;
}
