pub mod codecept;
pub mod codestyle;
pub mod create_site;
pub mod prepare;
pub mod report;
pub mod run_tests;
pub mod selenium;
