use metrics::{Label, counter};

/// Increments a named counter, tagging it with the service and any extra labels.
pub fn record_counter(name: &'static str, service: &str, labels: &[(&'static str, String)]) {
    let mut tags = Vec::with_capacity(labels.len() + 1);
    tags.push(Label::new("service", service.to_string()));
    tags.extend(
        labels
            .iter()
            .map(|(key, value)| Label::new(*key, value.clone())),
    );
    counter!(name, tags).increment(1);
}
