#[cfg(test)]
mod cache_tests;
#[cfg(test)]
mod database_tests;
