mod aggregator_tests;
mod histogram_tests;
mod intake_tests;
