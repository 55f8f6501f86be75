mod test_builder;
