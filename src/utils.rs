use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

pub fn is_env_enable(env_name: &str) -> bool {
	match std::env::var(env_name) {
		Ok(s) => {
			vec!["1", "true", "yes", "oui"].contains(&s.to_lowercase().as_str())
		},
		Err(_) => false
	}
}

pub fn query_string(pairs: &[(&str, &str)]) -> String {
	pairs.iter()
		.map(|(k, v)| format!(
			"{}={}",
			utf8_percent_encode(k, NON_ALPHANUMERIC),
			utf8_percent_encode(v, NON_ALPHANUMERIC)
		))
		.collect::<Vec<String>>()
		.join("&")
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn query_string_escapes_values() {
		let query = query_string(&[("department", "Computer Engineering"), ("subject", "C&C++")]);
		assert_eq!(query, "department=Computer%20Engineering&subject=C%26C%2B%2B");
	}

	#[test]
	fn empty_query_string() {
		assert_eq!(query_string(&[]), "");
	}
}
