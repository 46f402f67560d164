/// Raw selectors of a path query, exactly as they appear in the query string.
///
/// Empty values count as absent. A repeated key keeps its first value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathQuery {
    pub device_id: Option<String>,
    pub all: Option<String>,
    pub days: Option<String>,
    pub date: Option<String>,
}

impl PathQuery {
    pub fn device_id(&self) -> Option<&str> {
        non_empty(&self.device_id)
    }

    pub fn all(&self) -> Option<&str> {
        non_empty(&self.all)
    }

    pub fn days(&self) -> Option<&str> {
        non_empty(&self.days)
    }

    pub fn date(&self) -> Option<&str> {
        non_empty(&self.date)
    }
}

impl FromIterator<(String, String)> for PathQuery {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(pairs: I) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "device_id" => &mut query.device_id,
                "all" => &mut query.all,
                "days" => &mut query.days,
                "date" => &mut query.date,
                _ => continue,
            };
            slot.get_or_insert(value);
        }
        query
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> PathQuery {
        raw.iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn first_value_of_repeated_key_wins() {
        let query = pairs(&[
            ("device_id", "d1"),
            ("all", "1"),
            ("device_id", "d2"),
            ("all", "0"),
        ]);

        assert_eq!(query.device_id(), Some("d1"));
        assert_eq!(query.all(), Some("1"));
    }

    #[test]
    fn empty_first_value_is_absent() {
        let query = pairs(&[("device_id", ""), ("device_id", "d1"), ("days", "3")]);

        assert_eq!(query.device_id(), None);
        assert_eq!(query.days(), Some("3"));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let query = pairs(&[("foo", "bar"), ("date", "2024-05-01")]);

        assert_eq!(
            query,
            PathQuery {
                date: Some("2024-05-01".to_owned()),
                ..Default::default()
            }
        );
    }
}
