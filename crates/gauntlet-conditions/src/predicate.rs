//! Boolean-predicate condition evaluators.
//!
//! A condition references a registered no-arg predicate by name. Simple
//! names resolve in the element's local scope first (the suite's own
//! registrations), then the shared external scope; `::`-qualified names
//! resolve in the external scope only.

use gauntlet_core::{require_not_blank, ExtensionContext, PreconditionError};

use crate::decl::PredicateReference;
use crate::verdict::{ConditionVerdict, Polarity};

pub(crate) fn evaluate_predicate(
    decl: &PredicateReference,
    polarity: Polarity,
    ctx: &ExtensionContext,
) -> Result<ConditionVerdict, PreconditionError> {
    require_not_blank(&decl.reference, "reference")?;

    let resolved = if decl.reference.contains("::") {
        ctx.predicates.external(&decl.reference)
    } else {
        ctx.predicates
            .local(&decl.reference)
            .or_else(|| ctx.predicates.external(&decl.reference))
    };
    let predicate = resolved.ok_or_else(|| {
        PreconditionError::new(format!(
            "could not resolve condition predicate [{}] for {}",
            decl.reference, ctx.element.display_name
        ))
    })?;

    let result = predicate();
    let detail = format!(
        "Condition predicate [{}] evaluated to {}",
        decl.reference, result
    );
    let disabled = match polarity {
        Polarity::DisabledOnMatch => result,
        Polarity::EnabledOnMatch => !result,
    };
    Ok(if disabled {
        ConditionVerdict::disabled(detail).with_custom_reason(decl.custom_reason.as_deref())
    } else {
        ConditionVerdict::enabled(detail)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use gauntlet_core::{PredicateStore, TestElement};

    fn context_with(store: PredicateStore) -> ExtensionContext {
        ExtensionContext::new(TestElement::test("e/t", "predicate test")).with_predicates(store)
    }

    #[test]
    fn test_local_predicate_gates_execution() {
        let mut store = PredicateStore::new();
        store.register_local("is_quick_machine", || false);
        let ctx = context_with(store);

        let decl = PredicateReference::new("is_quick_machine");
        let verdict = evaluate_predicate(&decl, Polarity::EnabledOnMatch, &ctx).unwrap();
        assert!(verdict.is_disabled());
        assert_eq!(
            verdict.reason(),
            "Condition predicate [is_quick_machine] evaluated to false"
        );
    }

    #[test]
    fn test_disabled_polarity_inverts() {
        let mut store = PredicateStore::new();
        store.register_local("is_quick_machine", || false);
        let ctx = context_with(store);

        let decl = PredicateReference::new("is_quick_machine");
        let verdict = evaluate_predicate(&decl, Polarity::DisabledOnMatch, &ctx).unwrap();
        assert!(verdict.is_enabled());
    }

    #[test]
    fn test_qualified_reference_skips_local_scope() {
        let mut store = PredicateStore::new();
        store.register_local("infra::Host::on_ci", || true);
        let ctx = context_with(store);

        let decl = PredicateReference::new("infra::Host::on_ci");
        let err = evaluate_predicate(&decl, Polarity::EnabledOnMatch, &ctx).unwrap_err();
        assert!(err.message().contains("could not resolve"));
    }

    #[test]
    fn test_simple_name_falls_back_to_external_scope() {
        let mut store = PredicateStore::new();
        store.register_external("on_ci", || true);
        let ctx = context_with(store);

        let decl = PredicateReference::new("on_ci");
        let verdict = evaluate_predicate(&decl, Polarity::EnabledOnMatch, &ctx).unwrap();
        assert!(verdict.is_enabled());
    }

    #[test]
    fn test_blank_reference_is_configuration_error() {
        let ctx = context_with(PredicateStore::new());
        let decl = PredicateReference::new("   ");
        assert!(evaluate_predicate(&decl, Polarity::EnabledOnMatch, &ctx).is_err());
    }

    #[test]
    fn test_custom_reason_on_disabling_verdict() {
        let mut store = PredicateStore::new();
        store.register_local("has_gpu", || true);
        let ctx = context_with(store);

        let decl =
            PredicateReference::new("has_gpu").with_custom_reason("GPU runs skew the timings");
        let verdict = evaluate_predicate(&decl, Polarity::DisabledOnMatch, &ctx).unwrap();
        assert!(verdict.is_disabled());
        assert!(verdict.reason().ends_with("==> GPU runs skew the timings"));
    }
}
