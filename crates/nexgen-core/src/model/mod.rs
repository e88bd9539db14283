mod project;
mod reservation;

pub use project::*;
pub use reservation::*;

#[cfg(test)]
mod tests;
