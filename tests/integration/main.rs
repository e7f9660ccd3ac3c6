//! Integration tests for Sumi-Index

mod crawl_tests;
