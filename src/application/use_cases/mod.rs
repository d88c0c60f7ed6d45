pub mod test_case_gen;
