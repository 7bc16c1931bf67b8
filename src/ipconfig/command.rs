//! The static-assignment command for the OS network utility.

use std::fmt;

use super::IpConfigurationRequest;

/// Default network configuration utility.
pub const DEFAULT_NETSH: &str = "netsh";

/// Characters that cannot appear inside the quoted `name="..."` token.
const FORBIDDEN_NAME_CHARS: [char; 3] = ['"', '\r', '\n'];

/// Checks that an adapter name can be embedded in a command line.
///
/// # Errors
///
/// Returns a description of the problem if the name is empty or contains
/// a double quote or line break.
pub fn check_adapter_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("adapter name is empty".to_string());
    }
    if name.contains(FORBIDDEN_NAME_CHARS) {
        return Err(format!(
            "adapter name '{}' contains a quote or line break",
            name.escape_debug()
        ));
    }
    Ok(())
}

/// `<program> interface ip set address name="<adapter>" static <ip> <mask> [<gateway>]`.
///
/// The gateway token is omitted entirely when the request has none.
///
/// # Example
///
/// ```
/// use nodus_ip::ipconfig::{IpConfigurationRequest, NetshCommand};
/// use std::net::Ipv4Addr;
///
/// let req = IpConfigurationRequest::new(
///     "Ethernet (Intel(R) I219-V)",
///     Ipv4Addr::new(192, 168, 1, 50),
///     Ipv4Addr::new(255, 255, 255, 0),
/// );
/// let cmd = NetshCommand::static_address("netsh", req.adapter_name(), &req);
///
/// assert_eq!(
///     cmd.command_line(),
///     r#"netsh interface ip set address name="Ethernet" static 192.168.1.50 255.255.255.0"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetshCommand {
    program: String,
    adapter: String,
    args: Vec<String>,
}

impl NetshCommand {
    /// Builds the static-assignment command for `adapter`.
    #[must_use]
    pub fn static_address(
        program: impl Into<String>,
        adapter: &str,
        req: &IpConfigurationRequest,
    ) -> Self {
        let mut args: Vec<String> = ["interface", "ip", "set", "address"]
            .into_iter()
            .map(String::from)
            .collect();
        args.push(format!("name=\"{adapter}\""));
        args.push("static".to_string());
        args.push(req.target_ip.to_string());
        args.push(req.subnet_mask.to_string());
        if let Some(gateway) = req.gateway {
            args.push(gateway.to_string());
        }

        Self {
            program: program.into(),
            adapter: adapter.to_string(),
            args,
        }
    }

    /// The utility being invoked.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// The adapter being configured.
    #[must_use]
    pub fn adapter(&self) -> &str {
        &self.adapter
    }

    /// Argument tokens exactly as they appear on the command line.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Argument tokens as a POSIX shell passes them, with quotes removed.
    pub fn unquoted_args(&self) -> impl Iterator<Item = String> + '_ {
        self.args.iter().map(|arg| arg.replace('"', ""))
    }

    /// The full command line, suitable for a script or an error message.
    #[must_use]
    pub fn command_line(&self) -> String {
        self.to_string()
    }

    /// Builds a child process for running the command directly.
    ///
    /// On Windows the tokens are passed verbatim so the quoted name token
    /// reaches the utility unchanged. Elsewhere the quotes are removed, as a
    /// shell would.
    #[must_use]
    pub fn to_process(&self) -> tokio::process::Command {
        let mut cmd = tokio::process::Command::new(&self.program);

        #[cfg(windows)]
        for arg in &self.args {
            cmd.raw_arg(arg);
        }

        #[cfg(not(windows))]
        cmd.args(self.unquoted_args());

        cmd
    }
}

impl fmt::Display for NetshCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.program.contains(char::is_whitespace) {
            write!(f, "\"{}\"", self.program)?;
        } else {
            f.write_str(&self.program)?;
        }
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}
