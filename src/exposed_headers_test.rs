use super::*;

mod list {
    use super::*;

    #[test]
    fn should_trim_and_deduplicate_given_mixed_input() {
        let headers = ExposedHeaders::list([" X-Trace ", "x-trace", "", "X-Request-Id"]);

        assert_eq!(&*headers, &["X-Trace".to_string(), "X-Request-Id".to_string()]);
    }
}

mod header_value {
    use super::*;

    #[test]
    fn should_return_none_given_empty_list() {
        assert_eq!(ExposedHeaders::default().header_value(), None);
    }

    #[test]
    fn should_join_values_given_entries() {
        let headers = ExposedHeaders::list(["X-Trace", "X-Request-Id"]);

        assert_eq!(
            headers.header_value().as_deref(),
            Some("X-Trace, X-Request-Id")
        );
    }
}
