use crate::Algebra;
use std::fmt::{Display, Formatter};

/// Renders the algebra as an indented operator tree, one operator per line.
impl Display for Algebra {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.fmt_indented(f, 0)
    }
}

impl Algebra {
    fn fmt_indented(&self, f: &mut Formatter<'_>, indent: usize) -> std::fmt::Result {
        write!(f, "{:indent$}", "", indent = indent * 2)?;
        match self {
            Algebra::Bgp(elements) => {
                f.write_str("Bgp")?;
                for (i, element) in elements.iter().enumerate() {
                    f.write_str(if i == 0 { ": " } else { " . " })?;
                    write!(f, "{element}")?;
                }
                Ok(())
            }
            Algebra::Join { lhs, rhs } => {
                f.write_str("Join")?;
                fmt_children(f, indent, &[lhs.as_ref(), rhs.as_ref()])
            }
            Algebra::LeftJoin { lhs, rhs, filter } => {
                match filter {
                    Some(filter) => write!(f, "LeftJoin: {filter}")?,
                    None => f.write_str("LeftJoin")?,
                }
                fmt_children(f, indent, &[lhs.as_ref(), rhs.as_ref()])
            }
            Algebra::Union { lhs, rhs } => {
                f.write_str("Union")?;
                fmt_children(f, indent, &[lhs.as_ref(), rhs.as_ref()])
            }
            Algebra::Minus { lhs, rhs } => {
                f.write_str("Minus")?;
                fmt_children(f, indent, &[lhs.as_ref(), rhs.as_ref()])
            }
            Algebra::ExistsJoin {
                lhs,
                rhs,
                must_exist,
            } => {
                f.write_str(if *must_exist { "Exists" } else { "NotExists" })?;
                fmt_children(f, indent, &[lhs.as_ref(), rhs.as_ref()])
            }
            Algebra::Filter { inner, expression } => {
                write!(f, "Filter: {expression}")?;
                fmt_children(f, indent, &[inner.as_ref()])
            }
            Algebra::Extend {
                inner,
                variable,
                expression,
            } => {
                write!(f, "Extend: {variable} := {expression}")?;
                fmt_children(f, indent, &[inner.as_ref()])
            }
            Algebra::Bindings(bindings) => write!(f, "Bindings: {bindings}"),
            Algebra::Graph { inner, graph } => {
                write!(f, "Graph: {graph}")?;
                fmt_children(f, indent, &[inner.as_ref()])
            }
            Algebra::Service {
                endpoint,
                silent,
                pattern,
            } => {
                let silent = if *silent { " (silent)" } else { "" };
                write!(f, "Service{silent}: {endpoint} {pattern}")
            }
            Algebra::Path {
                subject,
                path,
                object,
                min_length,
                max_length,
            } => {
                let max_length = max_length.map(|max| max.to_string()).unwrap_or_default();
                write!(
                    f,
                    "Path: {subject} ({path}){{{min_length},{max_length}}} {object}"
                )
            }
        }
    }
}

fn fmt_children(f: &mut Formatter<'_>, indent: usize, children: &[&Algebra]) -> std::fmt::Result {
    for child in children {
        writeln!(f)?;
        child.fmt_indented(f, indent + 1)?;
    }
    Ok(())
}
