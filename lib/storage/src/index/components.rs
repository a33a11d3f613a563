use rdf_weave_model::{Term, Triple, TriplePosition};
use std::fmt::{Display, Formatter};

/// The ordering of the triple components in an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexComponents {
    SPO,
    POS,
    OSP,
}

impl IndexComponents {
    /// All orderings that the storage maintains.
    pub const ALL: [IndexComponents; 3] = [
        IndexComponents::SPO,
        IndexComponents::POS,
        IndexComponents::OSP,
    ];

    /// Returns the triple positions in the order of this index.
    pub fn inner(self) -> [TriplePosition; 3] {
        match self {
            IndexComponents::SPO => [
                TriplePosition::Subject,
                TriplePosition::Predicate,
                TriplePosition::Object,
            ],
            IndexComponents::POS => [
                TriplePosition::Predicate,
                TriplePosition::Object,
                TriplePosition::Subject,
            ],
            IndexComponents::OSP => [
                TriplePosition::Object,
                TriplePosition::Subject,
                TriplePosition::Predicate,
            ],
        }
    }

    /// Reorders a triple pattern (given in subject, predicate, object order) into the order of
    /// this index.
    pub fn reorder<'a>(self, pattern: [Option<&'a Term>; 3]) -> [Option<&'a Term>; 3] {
        let [subject, predicate, object] = pattern;
        self.inner().map(|position| match position {
            TriplePosition::Subject => subject,
            TriplePosition::Predicate => predicate,
            TriplePosition::Object => object,
        })
    }

    /// Reorders the nodes of `triple` into the order of this index.
    pub fn order_triple(self, triple: Triple) -> [Term; 3] {
        let Triple {
            subject,
            predicate,
            object,
        } = triple;
        match self {
            IndexComponents::SPO => [subject, predicate, object],
            IndexComponents::POS => [predicate, object, subject],
            IndexComponents::OSP => [object, subject, predicate],
        }
    }

    /// Restores a triple from nodes in the order of this index.
    pub fn restore_triple(self, nodes: [Term; 3]) -> Triple {
        let [first, second, third] = nodes;
        match self {
            IndexComponents::SPO => Triple::new(first, second, third),
            IndexComponents::POS => Triple::new(third, first, second),
            IndexComponents::OSP => Triple::new(second, third, first),
        }
    }
}

impl Display for IndexComponents {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            IndexComponents::SPO => "SPO",
            IndexComponents::POS => "POS",
            IndexComponents::OSP => "OSP",
        };
        f.write_str(name)
    }
}
