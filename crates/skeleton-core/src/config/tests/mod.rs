#[cfg(test)]
mod format_tests;
