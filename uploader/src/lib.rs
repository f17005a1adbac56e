pub mod api;
pub mod infra;
pub mod pipeline;

#[cfg(test)]
pub mod test_utils;
