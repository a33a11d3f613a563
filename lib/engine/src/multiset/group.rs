use crate::multiset::Solutions;
use indexmap::IndexMap;
use rdf_weave_model::{Solution, Term, Variable};

/// Solutions partitioned by the values of the grouping variables.
///
/// Each group is represented by a key solution that binds the grouping variables (unbound values
/// form their own group) and by the member solutions in their original order.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedSolutions {
    group_variables: Vec<Variable>,
    keys: Vec<Solution>,
    members: Vec<Vec<Solution>>,
}

impl GroupedSolutions {
    /// Groups `solutions` by `group_variables`. Without grouping variables, all solutions form a
    /// single group.
    pub fn new(group_variables: Vec<Variable>, solutions: Vec<Solution>) -> Self {
        let mut groups: IndexMap<Vec<Option<Term>>, Vec<Solution>> = IndexMap::new();
        for solution in solutions {
            let key = group_variables
                .iter()
                .map(|variable| solution.get(variable).cloned())
                .collect::<Vec<_>>();
            groups.entry(key).or_default().push(solution);
        }

        let (keys, members) = groups
            .into_iter()
            .map(|(key, members)| {
                let key = group_variables
                    .iter()
                    .cloned()
                    .zip(key)
                    .collect::<Solution>();
                (key, members)
            })
            .unzip();
        Self {
            group_variables,
            keys,
            members,
        }
    }

    pub fn group_variables(&self) -> &[Variable] {
        &self.group_variables
    }

    /// Returns one key solution per group.
    pub fn keys(&self) -> &[Solution] {
        &self.keys
    }

    /// Iterates over the groups as pairs of key and members.
    pub fn groups(&self) -> impl Iterator<Item = (&Solution, &[Solution])> {
        self.keys
            .iter()
            .zip(self.members.iter().map(Vec::as_slice))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub(crate) fn into_keys(self) -> Solutions {
        let mut solutions = Solutions::new(self.group_variables);
        solutions.extend(self.keys);
        solutions
    }
}
