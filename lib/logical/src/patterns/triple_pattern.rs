use crate::patterns::{ConstructContext, PatternItem};
use crate::PatternError;
use rdf_weave_model::{
    BindingLookup, Solution, ThinResult, Triple, TriplePosition, Variable,
};
use std::fmt::{Display, Formatter};

/// Describes which positions of a [TriplePattern] are used as keys when retrieving candidate
/// triples from a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexType {
    /// All positions are fixed. Evaluation is an existence check.
    NoVariables,
    /// No position is fixed. Evaluation is a scan, unless inbound bindings narrow it.
    None,
    Subject,
    SubjectPredicate,
    SubjectObject,
    Predicate,
    PredicateObject,
    Object,
}

impl IndexType {
    /// Returns the positions whose fixed nodes are index keys.
    pub fn key_positions(self) -> &'static [TriplePosition] {
        match self {
            IndexType::NoVariables => &[
                TriplePosition::Subject,
                TriplePosition::Predicate,
                TriplePosition::Object,
            ],
            IndexType::None => &[],
            IndexType::Subject => &[TriplePosition::Subject],
            IndexType::SubjectPredicate => &[TriplePosition::Subject, TriplePosition::Predicate],
            IndexType::SubjectObject => &[TriplePosition::Subject, TriplePosition::Object],
            IndexType::Predicate => &[TriplePosition::Predicate],
            IndexType::PredicateObject => &[TriplePosition::Predicate, TriplePosition::Object],
            IndexType::Object => &[TriplePosition::Object],
        }
    }

    pub fn uses_key(self, position: TriplePosition) -> bool {
        self.key_positions().contains(&position)
    }
}

/// Whether the dataset is expected to answer lookups with two fixed positions directly.
///
/// With [TripleIndexing::SingleKey], a pattern only uses its most selective fixed position as
/// index key and checks the other fixed positions while matching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TripleIndexing {
    #[default]
    Full,
    SingleKey,
}

/// A triple pattern of a basic graph pattern.
///
/// The [IndexType] is derived once on construction. If a variable occurs in more than one
/// position, the later occurrences are *repeated*: they are checked by comparing the positions of
/// a candidate triple and do not produce a second binding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TriplePattern {
    subject: PatternItem,
    predicate: PatternItem,
    object: PatternItem,
    index_type: IndexType,
    variables: Vec<Variable>,
    predicate_repeats_subject: bool,
    object_repeats: Option<TriplePosition>,
}

impl TriplePattern {
    /// Creates a new triple pattern, assuming that the dataset supports two-key lookups.
    pub fn try_new(
        subject: impl Into<PatternItem>,
        predicate: impl Into<PatternItem>,
        object: impl Into<PatternItem>,
    ) -> Result<Self, PatternError> {
        Self::try_new_with_indexing(subject, predicate, object, TripleIndexing::Full)
    }

    /// Creates a new triple pattern. Fails if the predicate is a blank node.
    pub fn try_new_with_indexing(
        subject: impl Into<PatternItem>,
        predicate: impl Into<PatternItem>,
        object: impl Into<PatternItem>,
        indexing: TripleIndexing,
    ) -> Result<Self, PatternError> {
        let subject = subject.into();
        let predicate = predicate.into();
        let object = object.into();

        if let PatternItem::BlankNode(bnode) = &predicate {
            return Err(PatternError::BlankNodePredicate(format!(
                "{subject} {bnode} {object}"
            )));
        }

        let subject_variable = subject.variable();
        let predicate_variable = predicate.variable();
        let object_variable = object.variable();

        let predicate_repeats_subject =
            predicate_variable.is_some() && predicate_variable == subject_variable;
        let object_repeats = if object_variable.is_none() {
            None
        } else if object_variable == subject_variable {
            Some(TriplePosition::Subject)
        } else if object_variable == predicate_variable {
            Some(TriplePosition::Predicate)
        } else {
            None
        };

        let mut variables = Vec::new();
        for variable in [subject_variable, predicate_variable, object_variable]
            .into_iter()
            .flatten()
        {
            if !variables.contains(&variable) {
                variables.push(variable);
            }
        }

        let index_type = select_index_type(&subject, &predicate, &object, indexing);
        Ok(Self {
            subject,
            predicate,
            object,
            index_type,
            variables,
            predicate_repeats_subject,
            object_repeats,
        })
    }

    pub fn subject(&self) -> &PatternItem {
        &self.subject
    }

    pub fn predicate(&self) -> &PatternItem {
        &self.predicate
    }

    pub fn object(&self) -> &PatternItem {
        &self.object
    }

    pub fn item(&self, position: TriplePosition) -> &PatternItem {
        match position {
            TriplePosition::Subject => &self.subject,
            TriplePosition::Predicate => &self.predicate,
            TriplePosition::Object => &self.object,
        }
    }

    pub fn index_type(&self) -> IndexType {
        self.index_type
    }

    /// The distinct variables of this pattern, in subject-predicate-object order.
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn has_no_variables(&self) -> bool {
        self.variables.is_empty()
    }

    /// Returns true if every triple of the dataset matches this pattern.
    pub fn is_accept_all(&self) -> bool {
        self.variables.len() == 3
    }

    /// Returns true if `position` holds a variable that already occurs in an earlier position.
    pub fn is_repeated(&self, position: TriplePosition) -> bool {
        match position {
            TriplePosition::Subject => false,
            TriplePosition::Predicate => self.predicate_repeats_subject,
            TriplePosition::Object => self.object_repeats.is_some(),
        }
    }

    /// Tests whether `triple` matches this pattern.
    ///
    /// Fixed positions that were not used as index keys are always compared, independent of
    /// `rigorous`. See [PatternItem::accepts] for the remaining positions.
    pub fn accepts(
        &self,
        rigorous: bool,
        lookup: &(impl BindingLookup + ?Sized),
        triple: &Triple,
    ) -> bool {
        if self.predicate_repeats_subject && triple.subject != triple.predicate {
            return false;
        }
        if let Some(repeated) = self.object_repeats {
            if *triple.get(repeated) != triple.object {
                return false;
            }
        }

        [
            TriplePosition::Subject,
            TriplePosition::Predicate,
            TriplePosition::Object,
        ]
        .into_iter()
        .all(|position| {
            let item = self.item(position);
            let rigorous = rigorous || (item.is_fixed() && !self.index_type.uses_key(position));
            item.accepts(rigorous, lookup, triple.get(position))
        })
    }

    /// Creates the solution that binds the variables of this pattern to the nodes of `triple`.
    pub fn create_result(&self, triple: &Triple) -> Solution {
        [
            TriplePosition::Subject,
            TriplePosition::Predicate,
            TriplePosition::Object,
        ]
        .into_iter()
        .filter(|position| !self.is_repeated(*position))
        .filter_map(|position| {
            let variable = self.item(position).variable()?;
            Some((variable, triple.get(position).clone()))
        })
        .collect()
    }

    /// Instantiates this pattern as a CONSTRUCT template.
    pub fn construct(&self, context: &mut ConstructContext<'_>) -> ThinResult<Triple> {
        Ok(Triple {
            subject: self.subject.construct_for(context)?,
            predicate: self.predicate.construct_for(context)?,
            object: self.object.construct_for(context)?,
        })
    }
}

fn select_index_type(
    subject: &PatternItem,
    predicate: &PatternItem,
    object: &PatternItem,
    indexing: TripleIndexing,
) -> IndexType {
    let full = indexing == TripleIndexing::Full;
    match (subject.is_fixed(), predicate.is_fixed(), object.is_fixed()) {
        (true, true, true) => IndexType::NoVariables,
        (true, true, false) if full => IndexType::SubjectPredicate,
        (true, false, true) if full => IndexType::SubjectObject,
        (true, _, _) => IndexType::Subject,
        (false, true, true) if full => IndexType::PredicateObject,
        (false, true, _) => IndexType::Predicate,
        (false, false, true) => IndexType::Object,
        (false, false, false) => IndexType::None,
    }
}

impl Display for TriplePattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.subject, self.predicate, self.object)
    }
}
