pub mod allocation;
pub mod report;
pub mod storage;

#[cfg(test)]
mod storage_test;
