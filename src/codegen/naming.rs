use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref MATCH_FIRST_CAP: Regex = Regex::new(r"(.)([A-Z][a-z]+)").unwrap();
    static ref MATCH_ALL_CAP: Regex = Regex::new(r"([a-z0-9])([A-Z])").unwrap();
}

/// Normalize an arbitrary resource name into a Terraform-safe identifier.
///
/// Splits CamelCase words and acronym boundaries with underscores, then
/// lowercases the result. Deterministic and idempotent; distinct inputs that
/// normalize to the same token are not deduplicated.
pub fn tf_name(name: &str) -> String {
    to_snake_case(name)
}

fn to_snake_case(input: &str) -> String {
    let snake = MATCH_FIRST_CAP.replace_all(input, "${1}_${2}");
    let snake = MATCH_ALL_CAP.replace_all(&snake, "${1}_${2}");
    snake.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tf_name_camel_case() {
        assert_eq!(tf_name("CamelCase"), "camel_case");
        assert_eq!(tf_name("myQueue"), "my_queue");
    }

    #[test]
    fn test_tf_name_acronym_boundary() {
        assert_eq!(tf_name("DeliveryStreamARN"), "delivery_stream_arn");
        assert_eq!(tf_name("myARNValue"), "my_arn_value");
    }

    #[test]
    fn test_tf_name_digits() {
        assert_eq!(tf_name("OrdersV2Table"), "orders_v2_table");
    }

    #[test]
    fn test_tf_name_already_snake() {
        assert_eq!(tf_name("already_snake_case"), "already_snake_case");
    }

    #[test]
    fn test_tf_name_is_lowercase() {
        for input in ["IamRoleLambdaExecution", "SNSTopic", "HelloWorld123"] {
            let normalized = tf_name(input);
            assert!(
                normalized.chars().all(|c| !c.is_uppercase()),
                "{} normalized to {} which contains uppercase",
                input,
                normalized
            );
        }
    }

    #[test]
    fn test_tf_name_idempotent() {
        for input in ["DeliveryStreamARN", "myQueue", "orders", "FooBarBaz"] {
            let once = tf_name(input);
            assert_eq!(tf_name(&once), once);
        }
    }
}
