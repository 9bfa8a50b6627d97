/// Parse pacman style dependency specifiers
use nom::{
    branch::alt,
    bytes::complete::{tag, take_until},
    combinator::{map, opt},
    sequence::{pair, preceded, terminated},
    IResult,
};

/// Version comparison attached to a dependency.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DepModifier {
    Any,
    Eq,
    Ge,
    Le,
    Gt,
    Lt,
}

/// One dependency specifier, `name[<op>version][: description]`.
/// `version` and `description` are empty when the input carries none.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dependency {
    pub name: Vec<u8>,
    pub version: Vec<u8>,
    pub description: Vec<u8>,
    pub modifier: DepModifier,
}

/// Name up to the comparison operator, plus the operator kind. The branch
/// order is load-bearing: `<` is searched for before `>` before `=`, over
/// the whole comparison region, so a string holding several operator
/// characters resolves by operator kind rather than leftmost occurrence.
fn comparator(i: &[u8]) -> IResult<&[u8], (&[u8], DepModifier)> {
    alt((
        map(
            pair(take_until("<"), preceded(tag("<"), opt(tag("=")))),
            |(name, eq): (&[u8], Option<&[u8]>)| match eq {
                Some(_) => (name, DepModifier::Le),
                None => (name, DepModifier::Lt),
            },
        ),
        map(
            pair(take_until(">"), preceded(tag(">"), opt(tag("=")))),
            |(name, eq): (&[u8], Option<&[u8]>)| match eq {
                Some(_) => (name, DepModifier::Ge),
                None => (name, DepModifier::Gt),
            },
        ),
        map(terminated(take_until("="), tag("=")), |name: &[u8]| {
            (name, DepModifier::Eq)
        }),
    ))(i)
}

/// Decompose one dependency specifier. Every byte string has a valid shape,
/// so this cannot fail: without an operator the modifier is `Any`, without
/// a `": "` the description is empty.
pub fn parse_dependency(s: &[u8]) -> Dependency {
    let (region, description) = match take_until::<_, _, nom::error::Error<&[u8]>>(": ")(s) {
        Ok((rest, region)) => (region, &rest[2..]),
        Err(_) => (s, &s[s.len()..]),
    };
    match comparator(region) {
        Ok((version, (name, modifier))) => Dependency {
            name: name.to_vec(),
            version: version.to_vec(),
            description: description.to_vec(),
            modifier,
        },
        Err(_) => Dependency {
            name: region.to_vec(),
            version: Vec::new(),
            description: description.to_vec(),
            modifier: DepModifier::Any,
        },
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn dep(name: &str, version: &str, description: &str, modifier: DepModifier) -> Dependency {
        Dependency {
            name: name.as_bytes().to_vec(),
            version: version.as_bytes().to_vec(),
            description: description.as_bytes().to_vec(),
            modifier,
        }
    }

    #[test]
    fn parse_specifiers() {
        let source = vec![
            ("%NAME%", dep("%NAME%", "", "", DepModifier::Any)),
            ("foo", dep("foo", "", "", DepModifier::Any)),
            ("foo>=1.2: bar", dep("foo", "1.2", "bar", DepModifier::Ge)),
            ("foo<1.0", dep("foo", "1.0", "", DepModifier::Lt)),
            ("foo<=1.0", dep("foo", "1.0", "", DepModifier::Le)),
            ("foo>1.0", dep("foo", "1.0", "", DepModifier::Gt)),
            ("foo=2:1.0-1", dep("foo", "2:1.0-1", "", DepModifier::Eq)),
            ("", dep("", "", "", DepModifier::Any)),
        ];
        for (input, expected) in source {
            assert_eq!(parse_dependency(input.as_bytes()), expected);
        }
    }

    #[test]
    fn operator_kind_precedence() {
        // `<` wins over an earlier `>` or `=`
        assert_eq!(parse_dependency(b"a>b<c"), dep("a>b", "c", "", DepModifier::Lt));
        assert_eq!(parse_dependency(b"a=b>c"), dep("a=b", "c", "", DepModifier::Gt));
    }

    #[test]
    fn description_region_is_excluded() {
        // Operator characters after the `": "` must not be picked up
        assert_eq!(
            parse_dependency(b"optdep: needed for a=b sync"),
            dep("optdep", "", "needed for a=b sync", DepModifier::Any)
        );
        assert_eq!(
            parse_dependency(b": bare description"),
            dep("", "", "bare description", DepModifier::Any)
        );
    }
}
