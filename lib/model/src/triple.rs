use oxrdf::Term;
use std::fmt::{Display, Formatter};

/// Identifies one of the three positions of a [Triple].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TriplePosition {
    Subject,
    Predicate,
    Object,
}

impl Display for TriplePosition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TriplePosition::Subject => f.write_str("subject"),
            TriplePosition::Predicate => f.write_str("predicate"),
            TriplePosition::Object => f.write_str("object"),
        }
    }
}

/// A generalized RDF triple.
///
/// Contrary to [oxrdf::Triple], every position may hold any [Term]. Query evaluation produces and
/// consumes triples as plain node tuples and only CONSTRUCT output checks that the positions hold
/// valid RDF (see [Triple::is_valid_rdf]).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Triple {
    pub subject: Term,
    pub predicate: Term,
    pub object: Term,
}

impl Triple {
    pub fn new(
        subject: impl Into<Term>,
        predicate: impl Into<Term>,
        object: impl Into<Term>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }

    /// Returns the node at the given `position`.
    pub fn get(&self, position: TriplePosition) -> &Term {
        match position {
            TriplePosition::Subject => &self.subject,
            TriplePosition::Predicate => &self.predicate,
            TriplePosition::Object => &self.object,
        }
    }

    /// Returns true if the subject is an IRI or a blank node, the predicate is an IRI, and the
    /// object is any term.
    pub fn is_valid_rdf(&self) -> bool {
        matches!(self.subject, Term::NamedNode(_) | Term::BlankNode(_))
            && matches!(self.predicate, Term::NamedNode(_))
    }
}

impl Display for Triple {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.subject, self.predicate, self.object)
    }
}

impl From<oxrdf::Triple> for Triple {
    fn from(value: oxrdf::Triple) -> Self {
        Self {
            subject: value.subject.into(),
            predicate: value.predicate.into(),
            object: value.object,
        }
    }
}
