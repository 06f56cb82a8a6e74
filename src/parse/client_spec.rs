/// Fields of interest from a `p4 client -o` form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClientSpec {
    pub root: String,
    pub owner: String,
    /// Final segment of the stream path.
    pub stream: String,
}

impl ClientSpec {
    pub fn is_complete(&self) -> bool {
        !self.root.is_empty() && !self.owner.is_empty() && !self.stream.is_empty()
    }
}

pub fn client_spec(text: &str) -> ClientSpec {
    let mut spec = ClientSpec::default();
    for line in text.lines() {
        if let Some(rest) = line.strip_prefix("Root:") {
            spec.root = rest.trim().to_string();
        } else if let Some(rest) = line.strip_prefix("Owner:") {
            spec.owner = rest.trim().to_string();
        } else if let Some(rest) = line.strip_prefix("Stream:") {
            spec.stream = rest
                .trim()
                .rsplit('/')
                .next()
                .unwrap_or_default()
                .to_string();
        }
    }
    spec
}
