//! Operator typing
//!
//! Operators are typed through capability interfaces of the language
//! module: an operand qualifies when its type has a supertype view of the
//! operator's interface, and the result is usually that view's type
//! argument. Binary operators are dispatched through [`OPERATOR_RULES`].

use super::TypeChecker;
use crate::error::{DiagnosticKind, TypecheckResult};
use lazy_static::lazy_static;
use std::collections::HashMap;
use tern_ast::{
    BinaryOperation, BinaryOperator, Expression, ExpressionKind, IncrementOperation,
    TypeOperation, UnaryOperation, UnaryOperator,
};
use tern_model::{DeclId, LanguageModule, ProducedType};

/// The language interface or class an operand must expose
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Capability {
    Summable,
    Numeric,
    Integral,
    Slots,
    Boolean,
    Equality,
    Comparable,
    Identifiable,
}

impl Capability {
    fn declaration(self, lang: &LanguageModule) -> DeclId {
        match self {
            Capability::Summable => lang.summable,
            Capability::Numeric => lang.numeric,
            Capability::Integral => lang.integral,
            Capability::Slots => lang.slots,
            Capability::Boolean => lang.boolean,
            Capability::Equality => lang.equality,
            Capability::Comparable => lang.comparable,
            Capability::Identifiable => lang.identifiable_object,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OperatorRule {
    /// Both operands promoted through `Castable` to a common type
    Arithmetic(Capability),
    /// `x += y`: the left operand decides, the right must promote to it
    ArithmeticAssign(Capability),
    /// Bitwise and logical operators; `assigns` for the compound forms
    Binary {
        capability: Capability,
        assigns: bool,
    },
    /// Equality, identity and ordering tests yielding `Boolean`
    Comparison(Capability),
    Compare,
    Range,
    Entry,
    Default,
    In,
    Assign,
}

impl OperatorRule {
    fn assigns(self) -> bool {
        matches!(
            self,
            OperatorRule::ArithmeticAssign(_)
                | OperatorRule::Binary { assigns: true, .. }
                | OperatorRule::Assign
        )
    }
}

lazy_static! {
    static ref OPERATOR_RULES: HashMap<BinaryOperator, OperatorRule> = build_operator_rules();
}

fn build_operator_rules() -> HashMap<BinaryOperator, OperatorRule> {
    use BinaryOperator::*;

    let binary = |capability, assigns| OperatorRule::Binary {
        capability,
        assigns,
    };
    let rules = [
        (Sum, OperatorRule::Arithmetic(Capability::Summable)),
        (Difference, OperatorRule::Arithmetic(Capability::Numeric)),
        (Product, OperatorRule::Arithmetic(Capability::Numeric)),
        (Quotient, OperatorRule::Arithmetic(Capability::Numeric)),
        (Power, OperatorRule::Arithmetic(Capability::Numeric)),
        (Remainder, OperatorRule::Arithmetic(Capability::Integral)),
        (AddAssign, OperatorRule::ArithmeticAssign(Capability::Summable)),
        (SubtractAssign, OperatorRule::ArithmeticAssign(Capability::Numeric)),
        (MultiplyAssign, OperatorRule::ArithmeticAssign(Capability::Numeric)),
        (DivideAssign, OperatorRule::ArithmeticAssign(Capability::Numeric)),
        (RemainderAssign, OperatorRule::ArithmeticAssign(Capability::Integral)),
        (Union, binary(Capability::Slots, false)),
        (Intersection, binary(Capability::Slots, false)),
        (XOr, binary(Capability::Slots, false)),
        (Complement, binary(Capability::Slots, false)),
        (UnionAssign, binary(Capability::Slots, true)),
        (IntersectionAssign, binary(Capability::Slots, true)),
        (XOrAssign, binary(Capability::Slots, true)),
        (ComplementAssign, binary(Capability::Slots, true)),
        (And, binary(Capability::Boolean, false)),
        (Or, binary(Capability::Boolean, false)),
        (AndAssign, binary(Capability::Boolean, true)),
        (OrAssign, binary(Capability::Boolean, true)),
        (Equal, OperatorRule::Comparison(Capability::Equality)),
        (NotEqual, OperatorRule::Comparison(Capability::Equality)),
        (Identical, OperatorRule::Comparison(Capability::Identifiable)),
        (Smaller, OperatorRule::Comparison(Capability::Comparable)),
        (Larger, OperatorRule::Comparison(Capability::Comparable)),
        (SmallAs, OperatorRule::Comparison(Capability::Comparable)),
        (LargeAs, OperatorRule::Comparison(Capability::Comparable)),
        (Compare, OperatorRule::Compare),
        (Range, OperatorRule::Range),
        (Entry, OperatorRule::Entry),
        (In, OperatorRule::In),
        (Default, OperatorRule::Default),
        (Assign, OperatorRule::Assign),
    ];
    rules.into_iter().collect()
}

/// The single type argument of a capability view, or the view itself for
/// a capability without type parameters
fn view_argument(view: &ProducedType) -> ProducedType {
    view.arguments().first().cloned().unwrap_or_else(|| view.clone())
}

impl TypeChecker<'_> {
    pub(super) fn check_binary(
        &mut self,
        expression: &Expression,
        operation: &BinaryOperation,
    ) -> TypecheckResult<ProducedType> {
        let left = self.check_expression(&operation.left)?;
        let right = self.check_expression(&operation.right)?;
        let Some(rule) = OPERATOR_RULES.get(&operation.operator).copied() else {
            return Ok(ProducedType::Unknown);
        };

        let ty = if left.is_unknown() || right.is_unknown() {
            match rule {
                OperatorRule::In => self.lang.boolean_type(),
                _ => ProducedType::Unknown,
            }
        } else {
            match rule {
                OperatorRule::Arithmetic(capability) => {
                    self.arithmetic(expression, operation, capability, &left, &right)
                }
                OperatorRule::ArithmeticAssign(capability) => {
                    self.arithmetic_assign(operation, capability, &left, &right)
                }
                OperatorRule::Binary { capability, .. } => {
                    self.binary(operation, capability, &left, &right)
                }
                OperatorRule::Comparison(capability) => {
                    self.comparison(operation, capability, &left, &right)
                }
                OperatorRule::Compare => self.compare(operation, &left, &right),
                OperatorRule::Range => self.range(operation, &left, &right),
                OperatorRule::Entry => self.entry(operation, &left, &right),
                OperatorRule::Default => self.default(operation, &left, &right),
                OperatorRule::In => self.in_operator(operation, &left, &right),
                OperatorRule::Assign => {
                    if !self.is_subtype(&right, &left) {
                        let message = format!("must be of type {}", self.display(&left));
                        self.error_on(&operation.right, DiagnosticKind::Assignability, message);
                    }
                    right
                }
            }
        };

        if rule.assigns() {
            self.check_assignable(&operation.left);
        }
        Ok(ty)
    }

    fn missing_capability(&mut self, operand: &Expression, declaration: DeclId) {
        let message = format!("must be of type: {}", self.name(declaration));
        self.error_on(operand, DiagnosticKind::MissingCapability, message);
    }

    fn arithmetic(
        &mut self,
        expression: &Expression,
        operation: &BinaryOperation,
        capability: Capability,
        left: &ProducedType,
        right: &ProducedType,
    ) -> ProducedType {
        let declaration = capability.declaration(self.lang);
        let right_view = self.supertype(right, declaration);
        let left_view = self.supertype(left, declaration);
        if right_view.is_none() {
            self.missing_capability(&operation.right, declaration);
        }
        if left_view.is_none() {
            self.missing_capability(&operation.left, declaration);
        }
        let (Some(left_view), Some(right_view)) = (left_view, right_view) else {
            return ProducedType::Unknown;
        };
        let left_type = view_argument(&left_view);
        let right_type = view_argument(&right_view);

        let (promoted, operand) = if self.promotes_to(&left_type, &right_type, &left_type) {
            (left_type.clone(), &operation.left)
        } else if self.promotes_to(&left_type, &right_type, &right_type) {
            (right_type.clone(), &operation.right)
        } else {
            let message = format!(
                "could not promote operands to a common type: {}, {}",
                self.display(&left_type),
                self.display(&right_type)
            );
            self.error_on(expression, DiagnosticKind::MissingCapability, message);
            return ProducedType::Unknown;
        };

        let required = ProducedType::declared(declaration, vec![promoted.clone()]);
        if self.is_subtype(&promoted, &required) {
            promoted
        } else {
            self.missing_capability(operand, declaration);
            ProducedType::Unknown
        }
    }

    /// Can both operand types be cast to `target`?
    fn promotes_to(&self, left: &ProducedType, right: &ProducedType, target: &ProducedType) -> bool {
        let castable = self.lang.castable_of(target.clone());
        self.is_subtype(left, &castable) && self.is_subtype(right, &castable)
    }

    fn arithmetic_assign(
        &mut self,
        operation: &BinaryOperation,
        capability: Capability,
        left: &ProducedType,
        right: &ProducedType,
    ) -> ProducedType {
        let declaration = capability.declaration(self.lang);
        let Some(view) = self.supertype(left, declaration) else {
            self.missing_capability(&operation.left, declaration);
            return ProducedType::Unknown;
        };
        let ty = view_argument(&view);
        if !self.is_subtype(right, &self.lang.castable_of(ty.clone())) {
            let message = format!("must be promotable to type: {}", self.display(&view));
            self.error_on(&operation.right, DiagnosticKind::MissingCapability, message);
        }
        ty
    }

    fn binary(
        &mut self,
        operation: &BinaryOperation,
        capability: Capability,
        left: &ProducedType,
        right: &ProducedType,
    ) -> ProducedType {
        let declaration = capability.declaration(self.lang);
        let Some(view) = self.supertype(left, declaration) else {
            self.missing_capability(&operation.left, declaration);
            return ProducedType::Unknown;
        };
        if !self.is_subtype(right, &view) {
            let message = format!("must be of type: {}", self.display(&view));
            self.error_on(&operation.right, DiagnosticKind::MissingCapability, message);
        }
        view_argument(&view)
    }

    fn comparison(
        &mut self,
        operation: &BinaryOperation,
        capability: Capability,
        left: &ProducedType,
        right: &ProducedType,
    ) -> ProducedType {
        let declaration = capability.declaration(self.lang);
        let Some(view) = self.supertype(left, declaration) else {
            self.missing_capability(&operation.left, declaration);
            return ProducedType::Unknown;
        };
        if !self.is_subtype(right, &view) {
            let message = format!("must be of type: {}", self.display(&view));
            self.error_on(&operation.right, DiagnosticKind::MissingCapability, message);
        }
        self.lang.boolean_type()
    }

    fn compare(
        &mut self,
        operation: &BinaryOperation,
        left: &ProducedType,
        right: &ProducedType,
    ) -> ProducedType {
        let Some(view) = self.supertype(left, self.lang.comparable) else {
            self.missing_capability(&operation.left, self.lang.comparable);
            return ProducedType::Unknown;
        };
        if !self.is_subtype(right, &view) {
            let message = format!("must be of type: {}", self.display(&view));
            self.error_on(&operation.right, DiagnosticKind::MissingCapability, message);
        }
        self.lang.type_(self.lang.comparison)
    }

    fn range(
        &mut self,
        operation: &BinaryOperation,
        left: &ProducedType,
        right: &ProducedType,
    ) -> ProducedType {
        let ordinal = self.lang.ordinal;
        if self.supertype(left, ordinal).is_none() {
            self.missing_capability(&operation.left, ordinal);
        }
        if self.supertype(right, ordinal).is_none() {
            self.missing_capability(&operation.right, ordinal);
        }
        let Some(comparable) = self.supertype(left, self.lang.comparable) else {
            self.missing_capability(&operation.left, self.lang.comparable);
            return ProducedType::Unknown;
        };
        let element = view_argument(&comparable);
        if self.is_subtype(right, &element) {
            self.lang.range_of(element)
        } else {
            let message = format!("must be of type: {}", self.display(&element));
            self.error_on(&operation.right, DiagnosticKind::MissingCapability, message);
            ProducedType::Unknown
        }
    }

    fn entry(
        &mut self,
        operation: &BinaryOperation,
        left: &ProducedType,
        right: &ProducedType,
    ) -> ProducedType {
        let equality = self.lang.equality;
        if self.supertype(left, equality).is_none() {
            self.missing_capability(&operation.left, equality);
        }
        if self.supertype(right, equality).is_none() {
            self.missing_capability(&operation.right, equality);
        }
        self.lang.entry_of(left.clone(), right.clone())
    }

    /// `x ? y`: the right operand supplies the value when `x` is null
    fn default(
        &mut self,
        operation: &BinaryOperation,
        left: &ProducedType,
        right: &ProducedType,
    ) -> ProducedType {
        if !self.engine.is_optional(left) {
            self.error_on(
                &operation.left,
                DiagnosticKind::MissingCapability,
                "must be of optional type",
            );
        }
        let optional = if self.engine.is_optional(right) {
            right.clone()
        } else {
            self.lang.optional(right.clone())
        };
        if !self.is_subtype(left, &optional) {
            let message = format!("must be of type: {}", self.display(&optional));
            self.error_on(&operation.left, DiagnosticKind::Assignability, message);
        }
        right.clone()
    }

    fn in_operator(
        &mut self,
        operation: &BinaryOperation,
        left: &ProducedType,
        right: &ProducedType,
    ) -> ProducedType {
        if !self.is_subtype(left, &self.lang.type_(self.lang.object)) {
            self.missing_capability(&operation.left, self.lang.object);
        }
        if !self.is_subtype(right, &self.lang.type_(self.lang.category)) {
            let equality = self.lang.type_(self.lang.equality);
            let iterates_equality = self
                .engine
                .iterated_type(right)
                .is_some_and(|element| self.is_subtype(&element, &equality));
            if !iterates_equality {
                self.error_on(
                    &operation.right,
                    DiagnosticKind::MissingCapability,
                    "must be of type: Category | Iterable<Equality>",
                );
            }
        }
        self.lang.boolean_type()
    }

    // --- unary operators ------------------------------------------------

    pub(super) fn check_unary(
        &mut self,
        expression: &Expression,
        operation: &UnaryOperation,
    ) -> TypecheckResult<ProducedType> {
        let operand = &operation.operand;
        let ty = self.check_expression(operand)?;
        let result = match operation.operator {
            UnaryOperator::Format => self.lang.type_(self.lang.string),
            UnaryOperator::Exists => {
                if !ty.is_unknown() {
                    self.check_optional(&ty, expression);
                }
                self.lang.boolean_type()
            }
            UnaryOperator::Nonempty => {
                if !ty.is_unknown() {
                    self.check_empty(&ty, expression);
                }
                self.lang.boolean_type()
            }
            _ if ty.is_unknown() => ProducedType::Unknown,
            UnaryOperator::Negative | UnaryOperator::Positive => {
                self.unary_capability(operand, &ty, self.lang.invertable)
            }
            UnaryOperator::Flip => self.unary_capability(operand, &ty, self.lang.slots),
            UnaryOperator::Not => self.unary_capability(operand, &ty, self.lang.boolean),
        };
        Ok(result)
    }

    fn unary_capability(
        &mut self,
        operand: &Expression,
        ty: &ProducedType,
        declaration: DeclId,
    ) -> ProducedType {
        match self.supertype(ty, declaration) {
            Some(view) => view_argument(&view),
            None => {
                self.missing_capability(operand, declaration);
                ProducedType::Unknown
            }
        }
    }

    /// `x++`, `--x`: an ordinal, assignable operand keeps its type
    pub(super) fn check_increment(
        &mut self,
        operation: &IncrementOperation,
    ) -> TypecheckResult<ProducedType> {
        let ty = self.check_expression(&operation.operand)?;
        if !ty.is_unknown() && self.supertype(&ty, self.lang.ordinal).is_none() {
            self.missing_capability(&operation.operand, self.lang.ordinal);
        }
        self.check_assignable(&operation.operand);
        Ok(ty)
    }

    pub(super) fn check_is_operation(
        &mut self,
        operation: &TypeOperation,
    ) -> TypecheckResult<ProducedType> {
        let ty = self.check_expression(&operation.operand)?;
        if !self.is_subtype(&ty, &self.lang.type_(self.lang.object)) {
            self.missing_capability(&operation.operand, self.lang.object);
        }
        let tested = self.resolve_type(&operation.type_);
        self.check_reified(&tested, &operation.type_);
        Ok(self.lang.boolean_type())
    }

    /// `extends` and `satisfies` operators are typed but not checked
    pub(super) fn check_unchecked_type_operation(
        &mut self,
        expression: &Expression,
        operation: &TypeOperation,
        message: &str,
    ) -> TypecheckResult<ProducedType> {
        self.check_expression(&operation.operand)?;
        self.resolve_type(&operation.type_);
        self.unsupported(expression.id, expression.span, message);
        Ok(self.lang.boolean_type())
    }

    /// The target of an assignment or increment must be a variable value
    fn check_assignable(&mut self, term: &Expression) {
        match &term.kind {
            ExpressionKind::BaseMember(_) | ExpressionKind::QualifiedMember(_) => {
                let Some(target) = self.analysis.target(term.id) else {
                    return;
                };
                let declaration = &self.model[target.declaration];
                let message = if !declaration.is_value() {
                    format!("member cannot be assigned: {}", declaration.name())
                } else if !declaration.variable {
                    format!("value is not variable: {}", declaration.name())
                } else {
                    return;
                };
                self.error_on(term, DiagnosticKind::Assignability, message);
            }
            _ => self.error_on(term, DiagnosticKind::Assignability, "expression cannot be assigned"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn every_binary_operator_has_a_rule() {
        use BinaryOperator::*;
        let all = [
            Sum, Difference, Product, Quotient, Power, Remainder, AddAssign, SubtractAssign,
            MultiplyAssign, DivideAssign, RemainderAssign, Union, Intersection, XOr, Complement,
            UnionAssign, IntersectionAssign, XOrAssign, ComplementAssign, And, Or, AndAssign,
            OrAssign, Equal, NotEqual, Identical, Smaller, Larger, SmallAs, LargeAs, Compare,
            Range, Entry, In, Default, Assign,
        ];
        for operator in all {
            assert!(OPERATOR_RULES.contains_key(&operator), "no rule for {operator}");
        }
        assert_eq!(OPERATOR_RULES.len(), all.len());
    }
}
