pub mod helper;

#[cfg(test)]
pub(crate) fn init_test_logger() {
    use simplelog::{Config, LevelFilter, TestLogger};

    // a logger may already be installed by another test
    let _ = TestLogger::init(LevelFilter::Trace, Config::default());
}
