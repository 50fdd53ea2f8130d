use serde::{Deserialize, Serialize};

/// A captured request and its (optional) response, both as raw HTTP text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpExchange {
    pub request: String,
    #[serde(default)]
    pub response: Option<String>,
}

impl HttpExchange {
    pub fn new(request: impl Into<String>, response: Option<String>) -> Self {
        Self {
            request: request.into(),
            // An empty capture is the same as no capture
            response: response.filter(|r| !r.trim().is_empty()),
        }
    }

    /// Short human label for the request, e.g. `POST example.com/login`.
    ///
    /// Falls back to the bare request line when there is no `Host`
    /// header, and to `unknown target` when the request is empty.
    pub fn target(&self) -> String {
        let mut lines = self.request.lines().map(|l| l.trim_end_matches('\r'));
        let request_line = match lines.next().map(str::trim) {
            Some(line) if !line.is_empty() => line,
            _ => return "unknown target".to_string(),
        };

        let mut parts = request_line.split_whitespace();
        let (method, path) = match (parts.next(), parts.next()) {
            (Some(method), Some(path)) => (method, path),
            _ => return request_line.to_string(),
        };

        // Absolute-form targets already carry the host
        if let Some(rest) = path
            .strip_prefix("http://")
            .or_else(|| path.strip_prefix("https://"))
        {
            return format!("{} {}", method, rest);
        }

        let host = lines
            .take_while(|line| !line.is_empty())
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.trim()
                    .eq_ignore_ascii_case("host")
                    .then(|| value.trim())
            });

        match host {
            Some(host) if !host.is_empty() => format!("{} {}{}", method, host, path),
            _ => request_line.to_string(),
        }
    }
}
