pub mod abilities;
pub mod ai;
pub mod conditions;
pub mod engine;
pub mod state;

#[cfg(test)]
mod tests;
