//! Type patterns, signatures and the specificity order
//!
//! A [`Signature`] is what a registration entry promises to accept. The
//! registry compares signatures with [`Signature::is_narrower_or_equal`],
//! a partial order built from three pattern kinds:
//!
//! - `Exact(T)` accepts exactly one type
//! - `Union{..}` accepts any of a fixed set of types
//! - `Any` accepts everything
//!
//! `Exact(T) ⊑ Union ∋ T ⊑ Any`, and unions are ordered by set inclusion.
//!
//! Designated keywords only take part in a comparison when the call supplies
//! them. Among entries that tie on what the call supplied, the one that
//! designates fewer of the omitted keywords is chosen
//! ([`Signature::outranks`]).

use std::any::{Any, TypeId};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// A concrete type known to the registry
#[derive(Clone, Copy, Debug)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// Key for type `T`
    pub fn of<T: Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl PartialOrd for TypeKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TypeKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.id.cmp(&other.id)
    }
}

/// Pattern matched against one argument's runtime type
#[derive(Clone, Debug)]
pub enum TypePattern {
    Exact(TypeKey),
    Union {
        label: Option<&'static str>,
        /// Sorted and deduplicated
        members: Vec<TypeKey>,
    },
    Any,
}

impl TypePattern {
    /// Pattern accepting exactly `T`
    pub fn of<T: Any>() -> Self {
        Self::Exact(TypeKey::of::<T>())
    }

    /// Pattern accepting any of `members`
    ///
    /// A union of a single type collapses to `Exact`.
    pub fn union(members: impl IntoIterator<Item = TypeKey>) -> Self {
        let mut members: Vec<TypeKey> = members.into_iter().collect();
        members.sort();
        members.dedup();
        if members.len() == 1 {
            return Self::Exact(members[0]);
        }
        Self::Union { label: None, members }
    }

    /// Union with a display label, e.g. `Numeric`
    pub fn named_union(label: &'static str, members: impl IntoIterator<Item = TypeKey>) -> Self {
        match Self::union(members) {
            Self::Union { members, .. } => Self::Union {
                label: Some(label),
                members,
            },
            other => other,
        }
    }

    /// Whether a value of runtime type `id` satisfies this pattern
    pub fn matches(&self, id: TypeId) -> bool {
        match self {
            Self::Exact(key) => key.id == id,
            Self::Union { members, .. } => members.iter().any(|m| m.id == id),
            Self::Any => true,
        }
    }

    /// `self ⊑ other`: every type accepted by `self` is accepted by `other`
    pub fn is_narrower_or_equal(&self, other: &TypePattern) -> bool {
        match (self, other) {
            (_, Self::Any) => true,
            (Self::Any, _) => false,
            (Self::Exact(a), _) => other.matches(a.id),
            (Self::Union { members, .. }, Self::Exact(b)) => {
                members.len() == 1 && members[0] == *b
            }
            (Self::Union { members: a, .. }, Self::Union { members: b, .. }) => {
                a.iter().all(|key| b.contains(key))
            }
        }
    }

    /// Whether both patterns accept exactly the same types
    pub fn same_as(&self, other: &TypePattern) -> bool {
        self.is_narrower_or_equal(other) && other.is_narrower_or_equal(self)
    }

    /// Pattern accepting the types accepted by both, `None` if disjoint
    pub fn intersect(&self, other: &TypePattern) -> Option<TypePattern> {
        match (self, other) {
            (Self::Any, p) | (p, Self::Any) => Some(p.clone()),
            (Self::Exact(a), p) | (p, Self::Exact(a)) => {
                p.matches(a.id).then_some(Self::Exact(*a))
            }
            (Self::Union { members: a, .. }, Self::Union { members: b, .. }) => {
                let common: Vec<TypeKey> = a.iter().filter(|k| b.contains(k)).copied().collect();
                (!common.is_empty()).then(|| Self::union(common))
            }
        }
    }
}

impl fmt::Display for TypePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(key) => write!(f, "{}", key.name),
            Self::Union {
                label: Some(label), ..
            } => write!(f, "{label}"),
            Self::Union { members, .. } => {
                let names: Vec<&str> = members.iter().map(|m| m.name).collect();
                write!(f, "Union[{}]", names.join(", "))
            }
            Self::Any => write!(f, "Any"),
        }
    }
}

/// Positional patterns plus designated keyword patterns
#[derive(Clone, Debug)]
pub struct Signature {
    positional: Vec<TypePattern>,
    keywords: BTreeMap<&'static str, TypePattern>,
}

impl Signature {
    /// Signature over positional patterns only
    pub fn new(positional: impl IntoIterator<Item = TypePattern>) -> Self {
        Self {
            positional: positional.into_iter().collect(),
            keywords: BTreeMap::new(),
        }
    }

    /// Designate a type-sensitive keyword argument
    ///
    /// When a call supplies `name`, its runtime type must match `pattern`.
    /// Absent keywords never prevent a match.
    pub fn keyword(mut self, name: &'static str, pattern: TypePattern) -> Self {
        self.keywords.insert(name, pattern);
        self
    }

    pub fn arity(&self) -> usize {
        self.positional.len()
    }

    pub fn positional(&self) -> &[TypePattern] {
        &self.positional
    }

    pub fn keywords(&self) -> &BTreeMap<&'static str, TypePattern> {
        &self.keywords
    }

    /// Whether the runtime types of a call satisfy this signature
    pub fn accepts<'a>(
        &self,
        positional: impl ExactSizeIterator<Item = TypeId>,
        keywords: impl Iterator<Item = (&'a str, TypeId)>,
    ) -> bool {
        if positional.len() != self.positional.len() {
            return false;
        }
        let positional_ok = self
            .positional
            .iter()
            .zip(positional)
            .all(|(pattern, id)| pattern.matches(id));
        positional_ok
            && keywords.into_iter().all(|(name, id)| {
                self.keywords
                    .get(name)
                    .map_or(true, |pattern| pattern.matches(id))
            })
    }

    /// `self ⊑ other`, pattern by pattern; undesignated keywords count as `Any`
    pub fn is_narrower_or_equal(&self, other: &Signature) -> bool {
        if self.positional.len() != other.positional.len() {
            return false;
        }
        let positional = self
            .positional
            .iter()
            .zip(&other.positional)
            .all(|(a, b)| a.is_narrower_or_equal(b));
        if !positional {
            return false;
        }
        self.keyword_names(other).all(|name| {
            let a = self.keywords.get(name).unwrap_or(&TypePattern::Any);
            let b = other.keywords.get(name).unwrap_or(&TypePattern::Any);
            a.is_narrower_or_equal(b)
        })
    }

    /// `self ⊑ other` over positions and the keywords in `supplied` only
    pub fn is_narrower_or_equal_for(&self, other: &Signature, supplied: &BTreeSet<&str>) -> bool {
        if self.positional.len() != other.positional.len() {
            return false;
        }
        let positional = self
            .positional
            .iter()
            .zip(&other.positional)
            .all(|(a, b)| a.is_narrower_or_equal(b));
        positional
            && supplied.iter().all(|name| {
                let a = self.keywords.get(*name).unwrap_or(&TypePattern::Any);
                let b = other.keywords.get(*name).unwrap_or(&TypePattern::Any);
                a.is_narrower_or_equal(b)
            })
    }

    /// Designated keywords that a call supplying `supplied` leaves out
    pub fn omitted(&self, supplied: &BTreeSet<&str>) -> BTreeSet<&'static str> {
        self.keywords
            .keys()
            .copied()
            .filter(|name| !supplied.contains(*name))
            .collect()
    }

    /// Whether `self` is preferred over `other` for a call supplying `supplied`
    ///
    /// Either `self` is strictly narrower on what the call supplied, or both
    /// are equal there and `self` designates strictly fewer omitted keywords.
    pub fn outranks(&self, other: &Signature, supplied: &BTreeSet<&str>) -> bool {
        if !self.is_narrower_or_equal_for(other, supplied) {
            return false;
        }
        if !other.is_narrower_or_equal_for(self, supplied) {
            return true;
        }
        let (mine, theirs) = (self.omitted(supplied), other.omitted(supplied));
        mine.len() < theirs.len() && mine.is_subset(&theirs)
    }

    /// Strictly more specific than `other`
    pub fn is_more_specific_than(&self, other: &Signature) -> bool {
        self.is_narrower_or_equal(other) && !other.is_narrower_or_equal(self)
    }

    /// Identical accepted types in every position and designated keyword
    pub fn same_as(&self, other: &Signature) -> bool {
        self.is_narrower_or_equal(other) && other.is_narrower_or_equal(self)
    }

    /// Signature accepting exactly the calls both accept when every
    /// designated keyword is supplied, `None` if there are none
    pub fn intersect(&self, other: &Signature) -> Option<Signature> {
        let supplied: BTreeSet<&str> = self.keyword_names(other).collect();
        self.intersect_for(other, &supplied)
    }

    /// Calls supplying exactly the keywords in `supplied` that both accept
    ///
    /// The result designates only supplied keywords; `None` if no such call
    /// exists.
    pub fn intersect_for(&self, other: &Signature, supplied: &BTreeSet<&str>) -> Option<Signature> {
        if self.positional.len() != other.positional.len() {
            return None;
        }
        let positional = self
            .positional
            .iter()
            .zip(&other.positional)
            .map(|(a, b)| a.intersect(b))
            .collect::<Option<Vec<_>>>()?;
        let mut keywords = BTreeMap::new();
        for name in self.keyword_names(other).filter(|name| supplied.contains(*name)) {
            let a = self.keywords.get(name).unwrap_or(&TypePattern::Any);
            let b = other.keywords.get(name).unwrap_or(&TypePattern::Any);
            let common = a.intersect(b)?;
            if !matches!(common, TypePattern::Any) {
                keywords.insert(name, common);
            }
        }
        Some(Signature { positional, keywords })
    }

    /// Keywords designated by either signature
    pub fn keyword_names<'a>(
        &'a self,
        other: &'a Signature,
    ) -> impl Iterator<Item = &'static str> + 'a {
        self.keywords
            .keys()
            .chain(other.keywords.keys().filter(|k| !self.keywords.contains_key(*k)))
            .copied()
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = self.positional.iter().map(|p| p.to_string()).collect();
        parts.extend(self.keywords.iter().map(|(k, p)| format!("{k}: {p}")));
        write!(f, "({})", parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numeric() -> TypePattern {
        TypePattern::named_union("Numeric", [TypeKey::of::<f64>(), TypeKey::of::<Vec<f64>>()])
    }

    #[test]
    fn test_pattern_matching() {
        assert!(TypePattern::of::<f64>().matches(TypeId::of::<f64>()));
        assert!(!TypePattern::of::<f64>().matches(TypeId::of::<f32>()));
        assert!(numeric().matches(TypeId::of::<Vec<f64>>()));
        assert!(!numeric().matches(TypeId::of::<i32>()));
        assert!(TypePattern::Any.matches(TypeId::of::<String>()));
    }

    #[test]
    fn test_pattern_order() {
        let exact = TypePattern::of::<f64>();
        let wide = TypePattern::union([
            TypeKey::of::<f64>(),
            TypeKey::of::<Vec<f64>>(),
            TypeKey::of::<f32>(),
        ]);

        assert!(exact.is_narrower_or_equal(&numeric()));
        assert!(numeric().is_narrower_or_equal(&wide));
        assert!(!wide.is_narrower_or_equal(&numeric()));
        assert!(wide.is_narrower_or_equal(&TypePattern::Any));
        assert!(!TypePattern::Any.is_narrower_or_equal(&exact));
        assert!(!TypePattern::of::<i32>().is_narrower_or_equal(&numeric()));
    }

    #[test]
    fn test_union_is_order_insensitive() {
        let a = TypePattern::union([TypeKey::of::<f64>(), TypeKey::of::<f32>()]);
        let b = TypePattern::union([TypeKey::of::<f32>(), TypeKey::of::<f64>(), TypeKey::of::<f32>()]);
        assert!(a.same_as(&b));
        assert!(matches!(
            TypePattern::union([TypeKey::of::<f64>()]),
            TypePattern::Exact(_)
        ));
    }

    #[test]
    fn test_signature_specificity() {
        let narrow = Signature::new([TypePattern::of::<f64>()]);
        let broad = Signature::new([numeric()]);
        let any = Signature::new([TypePattern::Any]);

        assert!(narrow.is_more_specific_than(&broad));
        assert!(broad.is_more_specific_than(&any));
        assert!(!any.is_more_specific_than(&narrow));
        assert!(!narrow.is_more_specific_than(&narrow.clone()));
        assert!(narrow.same_as(&narrow.clone()));
    }

    #[test]
    fn test_designated_keywords() {
        let plain = Signature::new([TypePattern::of::<f64>()]);
        let with_x = plain.clone().keyword("x", TypePattern::of::<Vec<f64>>());

        assert!(with_x.is_more_specific_than(&plain));
        assert!(!with_x.same_as(&plain));

        let f = TypeId::of::<f64>();
        let v = TypeId::of::<Vec<f64>>();
        assert!(with_x.accepts([f].into_iter(), [("x", v)].into_iter()));
        assert!(!with_x.accepts([f].into_iter(), [("x", f)].into_iter()));
        // undesignated keywords are never inspected
        assert!(with_x.accepts([f].into_iter(), [("axis", f)].into_iter()));
        assert!(with_x.accepts([f].into_iter(), std::iter::empty()));
        assert!(!with_x.accepts([f, f].into_iter(), std::iter::empty()));
    }

    #[test]
    fn test_omitted_keywords_do_not_count() {
        let plain = Signature::new([TypePattern::of::<f64>()]);
        let with_x = plain.clone().keyword("x", TypePattern::of::<Vec<f64>>());
        let without: BTreeSet<&str> = BTreeSet::new();
        let with: BTreeSet<&str> = ["x"].into_iter().collect();

        assert!(plain.outranks(&with_x, &without));
        assert!(!with_x.outranks(&plain, &without));
        assert!(with_x.outranks(&plain, &with));
        assert!(!plain.outranks(&with_x, &with));
        assert_eq!(with_x.omitted(&without), ["x"].into_iter().collect());

        // a narrower position still wins when the keyword is left out
        let wide_x = Signature::new([numeric()]).keyword("x", TypePattern::of::<f32>());
        assert!(with_x.outranks(&wide_x, &without));
    }

    #[test]
    fn test_intersections() {
        let exact = TypePattern::of::<f64>();
        assert!(exact.intersect(&numeric()).unwrap().same_as(&exact));
        assert!(TypePattern::of::<i32>().intersect(&numeric()).is_none());
        assert!(TypePattern::Any.intersect(&numeric()).unwrap().same_as(&numeric()));

        let other = TypePattern::union([TypeKey::of::<Vec<f64>>(), TypeKey::of::<f32>()]);
        let common = numeric().intersect(&other).unwrap();
        assert!(common.same_as(&TypePattern::of::<Vec<f64>>()));

        let a = Signature::new([numeric(), TypePattern::Any]);
        let b = Signature::new([TypePattern::Any, TypePattern::of::<f64>()]);
        let both = a.intersect(&b).unwrap();
        assert!(both.same_as(&Signature::new([numeric(), TypePattern::of::<f64>()])));
        assert!(a.intersect(&Signature::new([TypePattern::Any])).is_none());

        // disjoint keywords still share the calls that omit them
        let xs = Signature::new([numeric()]).keyword("x", TypePattern::of::<Vec<f64>>());
        let xf = Signature::new([numeric()]).keyword("x", TypePattern::of::<f32>());
        assert!(xs.intersect(&xf).is_none());
        let shared = xs.intersect_for(&xf, &BTreeSet::new()).unwrap();
        assert!(shared.same_as(&Signature::new([numeric()])));
    }

    #[test]
    fn test_signature_display() {
        let sig = Signature::new([numeric(), TypePattern::Any])
            .keyword("x", TypePattern::of::<f64>());
        assert_eq!(sig.to_string(), "(Numeric, Any, x: f64)");
    }
}
