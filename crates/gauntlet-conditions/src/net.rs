//! Loopback port probing.

use std::net::{Ipv4Addr, TcpListener};

use gauntlet_core::PreconditionError;

use crate::decl::PortCondition;
use crate::verdict::ConditionVerdict;

/// Whether a loopback TCP listener can currently be bound on `port`.
///
/// The probe binds and immediately drops the listener, so the answer is
/// best-effort: another process may take the port between evaluation and
/// use. Callers must tolerate either outcome near that race.
pub fn loopback_port_bindable(port: u16) -> bool {
    TcpListener::bind((Ipv4Addr::LOCALHOST, port)).is_ok()
}

/// Disabled iff the declared loopback port can be (and transiently is)
/// bound at evaluation time.
pub(crate) fn evaluate_port(decl: &PortCondition) -> Result<ConditionVerdict, PreconditionError> {
    Ok(if loopback_port_bindable(decl.port) {
        ConditionVerdict::disabled(format!(
            "Disabled because loopback port {} could be bound",
            decl.port
        ))
        .with_custom_reason(decl.custom_reason.as_deref())
    } else {
        ConditionVerdict::enabled(format!(
            "Enabled because loopback port {} is already in use",
            decl.port
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bound_port_keeps_element_enabled() {
        // Hold the port ourselves so the probe cannot bind it.
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).expect("bind ephemeral");
        let port = listener.local_addr().expect("local addr").port();

        let verdict = evaluate_port(&PortCondition::new(port)).unwrap();
        assert!(verdict.is_enabled());
        assert!(verdict.reason().contains(&port.to_string()));
        drop(listener);
    }

    #[test]
    fn test_free_port_verdict_names_the_port() {
        // Find a port that was free a moment ago; the probe outcome is
        // best-effort, so assert only on the verdict's shape.
        let port = {
            let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).expect("bind ephemeral");
            listener.local_addr().expect("local addr").port()
        };

        let verdict = evaluate_port(&PortCondition::new(port)).unwrap();
        assert!(verdict.reason().contains(&port.to_string()));
    }
}
