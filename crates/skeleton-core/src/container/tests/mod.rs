// Container test module
#[cfg(test)]
mod binding_tests;
#[cfg(test)]
mod concurrency_tests;
