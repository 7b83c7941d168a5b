mod proptest_split;
