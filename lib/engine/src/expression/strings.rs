use rdf_weave_model::{Literal, Term, ThinError, ThinResult, TypedValueRef};
use regex::{Regex, RegexBuilder};
use std::borrow::Cow;

/// A string literal argument: its lexical form and an optional language tag.
struct StringArgument<'a> {
    value: &'a str,
    language: Option<&'a str>,
}

impl<'a> StringArgument<'a> {
    fn try_from_term(term: &'a Term) -> ThinResult<Self> {
        match TypedValueRef::from(term.as_ref()) {
            TypedValueRef::SimpleLiteral(value) => Ok(Self {
                value,
                language: None,
            }),
            TypedValueRef::LanguageStringLiteral { value, language } => Ok(Self {
                value,
                language: Some(language),
            }),
            _ => ThinError::expected(),
        }
    }

    /// Tests the [argument compatibility](https://www.w3.org/TR/sparql11-query/#func-arg-compatibility)
    /// of two string arguments.
    fn is_compatible_with(&self, other: &StringArgument<'_>) -> bool {
        match (self.language, other.language) {
            (_, None) => true,
            (Some(lhs), Some(rhs)) => lhs.eq_ignore_ascii_case(rhs),
            (None, Some(_)) => false,
        }
    }

    fn with_value(&self, value: String) -> Term {
        match self.language {
            Some(language) => Literal::new_language_tagged_literal_unchecked(value, language),
            None => Literal::new_simple_literal(value),
        }
        .into()
    }
}

pub(super) fn str(term: &Term) -> ThinResult<Term> {
    let value = match term {
        Term::NamedNode(node) => node.as_str(),
        Term::Literal(literal) => literal.value(),
        Term::BlankNode(_) => return ThinError::expected(),
    };
    Ok(Literal::new_simple_literal(value).into())
}

pub(super) fn str_len(term: &Term) -> ThinResult<Term> {
    let argument = StringArgument::try_from_term(term)?;
    let length = i64::try_from(argument.value.chars().count())?;
    Ok(Literal::from(length).into())
}

pub(super) fn map_string(term: &Term, map: impl Fn(&str) -> String) -> ThinResult<Term> {
    let argument = StringArgument::try_from_term(term)?;
    Ok(argument.with_value(map(argument.value)))
}

pub(super) fn test_strings(
    text: &Term,
    pattern: &Term,
    test: impl Fn(&str, &str) -> bool,
) -> ThinResult<Term> {
    let text = StringArgument::try_from_term(text)?;
    let pattern = StringArgument::try_from_term(pattern)?;
    if !text.is_compatible_with(&pattern) {
        return ThinError::expected();
    }
    Ok(Literal::from(test(text.value, pattern.value)).into())
}

pub(super) fn concat(parts: &[Term]) -> ThinResult<Term> {
    let parts = parts
        .iter()
        .map(StringArgument::try_from_term)
        .collect::<ThinResult<Vec<_>>>()?;
    let value = parts.iter().map(|part| part.value).collect::<String>();
    let language = match parts.split_first() {
        Some((first, rest)) if rest.iter().all(|part| part.language == first.language) => {
            first.language
        }
        _ => None,
    };
    Ok(StringArgument {
        value: "",
        language,
    }
    .with_value(value))
}

pub(super) fn lang_matches(tag: &Term, range: &Term) -> ThinResult<Term> {
    let (TypedValueRef::SimpleLiteral(tag), TypedValueRef::SimpleLiteral(range)) = (
        TypedValueRef::from(tag.as_ref()),
        TypedValueRef::from(range.as_ref()),
    ) else {
        return ThinError::expected();
    };

    let matches = if range == "*" {
        !tag.is_empty()
    } else {
        let mut tag_parts = tag.split('-');
        range.split('-').all(|range_part| {
            tag_parts
                .next()
                .is_some_and(|tag_part| tag_part.eq_ignore_ascii_case(range_part))
        })
    };
    Ok(Literal::from(matches).into())
}

pub(super) fn regex(text: &Term, pattern: &Term, flags: Option<&Term>) -> ThinResult<Term> {
    let text = StringArgument::try_from_term(text)?;
    let TypedValueRef::SimpleLiteral(pattern) = TypedValueRef::from(pattern.as_ref()) else {
        return ThinError::expected();
    };
    let flags = match flags.map(|flags| TypedValueRef::from(flags.as_ref())) {
        None => None,
        Some(TypedValueRef::SimpleLiteral(flags)) => Some(flags),
        Some(_) => return ThinError::expected(),
    };
    let regex = compile_pattern(pattern, flags).ok_or(ThinError {})?;
    Ok(Literal::from(regex.is_match(text.value)).into())
}

fn compile_pattern(pattern: &str, flags: Option<&str>) -> Option<Regex> {
    const REGEX_SIZE_LIMIT: usize = 1_000_000;

    let mut pattern = Cow::Borrowed(pattern);
    let flags = flags.unwrap_or_default();
    if flags.contains('q') {
        pattern = regex::escape(&pattern).into();
    }
    let mut regex_builder = RegexBuilder::new(&pattern);
    regex_builder.size_limit(REGEX_SIZE_LIMIT);
    for flag in flags.chars() {
        match flag {
            's' => {
                regex_builder.dot_matches_new_line(true);
            }
            'm' => {
                regex_builder.multi_line(true);
            }
            'i' => {
                regex_builder.case_insensitive(true);
            }
            'x' => {
                regex_builder.ignore_whitespace(true);
            }
            'q' => (),
            _ => return None,
        }
    }
    regex_builder.build().ok()
}
