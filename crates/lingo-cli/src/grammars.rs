use std::str::FromStr;

use lingo::{GrammarBuilder, Result, Rule};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DemoGrammar {
    Identifier,
    NumberList,
    Calculator,
}

impl DemoGrammar {
    pub fn name(self) -> &'static str {
        match self {
            DemoGrammar::Identifier => "ident",
            DemoGrammar::NumberList => "list",
            DemoGrammar::Calculator => "calc",
        }
    }

    pub fn build(self, g: &GrammarBuilder) -> Result<Rule<'_>> {
        match self {
            DemoGrammar::Identifier => identifier(g),
            DemoGrammar::NumberList => number_list(g),
            DemoGrammar::Calculator => calculator(g),
        }
    }
}

impl FromStr for DemoGrammar {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "ident" => Ok(DemoGrammar::Identifier),
            "list" => Ok(DemoGrammar::NumberList),
            "calc" => Ok(DemoGrammar::Calculator),
            _ => Err(format!("Unknown grammar `{s}`, expected one of ident, list, calc")),
        }
    }
}

/// `identifier = ("_" | letter) {letter | digit | "_"}`
fn identifier(g: &GrammarBuilder) -> Result<Rule<'_>> {
    let letter = (g.range('a', 'z')? | g.range('A', 'Z')?).named("letter");
    let digit = g.range('0', '9')?.named("digit");
    let underscore = g.literal('_');
    let alphanum = (letter | digit | underscore).named("alphanum");

    Ok(((underscore | letter) + alphanum.zero_or_more()).named("identifier"))
}

/// `list = number {"," number}`
fn number_list(g: &GrammarBuilder) -> Result<Rule<'_>> {
    let digit = g.range('0', '9')?.named("digit");
    let number = g.repeat(digit, 1, 0)?.named("number");
    let tail = g.repeat(g.literal(',') + number, 0, 0)?;

    Ok((number + tail).named("list"))
}

/// ```text
/// expression = ["+"|"-"] term {("+"|"-") term}
/// term = factor {("*"|"/") factor}
/// factor = number | "(" expression ")"
/// ```
fn calculator(g: &GrammarBuilder) -> Result<Rule<'_>> {
    let digit = g.range('0', '9')?.named("digit");
    let sign = g.choice_of(['+', '-']);
    let op = g.choice_of(['*', '/']);
    let ws = g.choice_of([' ', '\t', '\n', '\r']).zero_or_more();

    let expression_ref = g.placeholder();
    let number = (digit.one_or_more() + ws).named("number");
    let lparen = g.literal('(') + ws;
    let rparen = g.literal(')') + ws;

    let factor = (number | (lparen + expression_ref + rparen)).named("factor");
    let term = (factor + (op + ws + factor).zero_or_more()).named("term");
    let expression =
        (sign.repeat(0, 1)? + ws + term + (sign + ws + term).zero_or_more()).named("expression");
    expression_ref.bind(expression)?;

    Ok(expression)
}
