#[cfg(test)]
mod infrastructure_tests;
