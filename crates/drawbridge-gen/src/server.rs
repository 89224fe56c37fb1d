use crate::{Error, Result};

/// GNS3 server coordinates, read from the two-line details format: host on
/// the first line, port on the second.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gns3Server {
    pub host: String,
    pub port: u16,
}

impl Gns3Server {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Parses the `gns3_server_details.txt` format. Blank lines are ignored.
    pub fn parse_details(text: &str) -> Result<Self> {
        let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());

        let host = lines.next().ok_or_else(|| Error::ServerDetails {
            message: "missing host line".to_string(),
        })?;
        let port_line = lines.next().ok_or_else(|| Error::ServerDetails {
            message: "missing port line".to_string(),
        })?;
        let port = port_line
            .parse::<u16>()
            .map_err(|_| Error::ServerDetails {
                message: format!("port is not a number: {port_line}"),
            })?;

        Ok(Self::new(host, port))
    }

    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_two_line_details() {
        let server = Gns3Server::parse_details("192.168.56.10\n3080\n").unwrap();
        assert_eq!(server.host, "192.168.56.10");
        assert_eq!(server.port, 3080);
        assert_eq!(server.base_url(), "http://192.168.56.10:3080");
    }

    #[test]
    fn blank_lines_are_ignored() {
        let server = Gns3Server::parse_details("\n  gns3.lab \n\n 3080 \n").unwrap();
        assert_eq!(server.host, "gns3.lab");
        assert_eq!(server.port, 3080);
    }

    #[test]
    fn missing_port_line_is_a_typed_error() {
        let err = Gns3Server::parse_details("192.168.56.10\n").unwrap_err();
        assert!(err.to_string().contains("missing port line"));
    }

    #[test]
    fn non_numeric_port_is_a_typed_error() {
        let err = Gns3Server::parse_details("192.168.56.10\nthreethousand").unwrap_err();
        assert!(err.to_string().contains("port is not a number"));
    }
}
