//! Parser for spreadsheet formula text such as `=CDB(1000; "115%"; DATE(2017;1;1))`.
//!
//! Only a single top-level call is supported. Arguments are literals: quoted
//! strings, numbers, `TRUE`/`FALSE`, `DATE(year, month, day)` or bare tokens,
//! which are kept as text (`115%`, `ABEV3`). Both `,` and `;` separate
//! arguments. An argument list that uses `;` is read the pt-BR way, with `,`
//! as the decimal mark: `LCA(5000,00; 94,5%; DATE(2017;1;1))`.

use crate::domain::model::CellValue;
use crate::utils::error::{GranaError, Result};
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct FormulaCall {
    pub name: String,
    pub args: Vec<CellValue>,
}

pub fn parse_formula(input: &str) -> Result<FormulaCall> {
    Parser::new(input).formula()
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
    decimal_comma: bool,
}

impl Parser {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
            decimal_comma: false,
        }
    }

    fn formula(&mut self) -> Result<FormulaCall> {
        self.skip_ws();
        self.eat('=');
        self.skip_ws();
        let name = self.identifier()?;
        self.skip_ws();
        if !self.eat('(') {
            return Err(self.error(format!("expected '(' after {}", name)));
        }
        let args = self.arguments()?;
        self.skip_ws();
        if let Some(c) = self.peek() {
            return Err(self.error(format!("unexpected '{}' after closing parenthesis", c)));
        }
        Ok(FormulaCall { name, args })
    }

    /// 讀取參數直到對應的 `)`（`(` 已被吃掉）
    fn arguments(&mut self) -> Result<Vec<CellValue>> {
        let outer = self.decimal_comma;
        self.decimal_comma = self.list_uses_semicolons();
        let args = self.argument_list();
        self.decimal_comma = outer;
        args
    }

    fn argument_list(&mut self) -> Result<Vec<CellValue>> {
        let mut args = Vec::new();
        self.skip_ws();
        if self.eat(')') {
            return Ok(args);
        }
        loop {
            args.push(self.argument()?);
            self.skip_ws();
            match self.bump() {
                Some(';') => continue,
                Some(',') if !self.decimal_comma => continue,
                Some(')') => return Ok(args),
                Some(c) => {
                    self.pos -= 1;
                    return Err(self.error(format!("expected ',', ';' or ')', found '{}'", c)));
                }
                None => return Err(self.error("missing closing parenthesis")),
            }
        }
    }

    /// 往後看到對應的 `)` 為止，這一層是否出現 `;`
    fn list_uses_semicolons(&self) -> bool {
        let mut depth = 0usize;
        let mut quoted = false;
        for &c in &self.chars[self.pos..] {
            match c {
                '"' => quoted = !quoted,
                _ if quoted => {}
                '(' => depth += 1,
                ')' if depth == 0 => return false,
                ')' => depth -= 1,
                ';' if depth == 0 => return true,
                _ => {}
            }
        }
        false
    }

    fn argument(&mut self) -> Result<CellValue> {
        self.skip_ws();
        match self.peek() {
            Some('"') => self.string().map(CellValue::Text),
            Some(';') | Some(')') => Ok(CellValue::Empty),
            Some(',') if !self.decimal_comma => Ok(CellValue::Empty),
            None => Err(self.error("unexpected end of formula")),
            Some(_) => self.bare(),
        }
    }

    fn string(&mut self) -> Result<String> {
        let start = self.pos;
        self.bump();
        let mut text = String::new();
        loop {
            match self.bump() {
                Some('"') if self.peek() == Some('"') => {
                    self.bump();
                    text.push('"');
                }
                Some('"') => return Ok(text),
                Some(c) => text.push(c),
                None => {
                    return Err(GranaError::FormulaError {
                        position: start,
                        message: "unterminated string".to_string(),
                    })
                }
            }
        }
    }

    fn bare(&mut self) -> Result<CellValue> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_whitespace()
                || matches!(c, ';' | '(' | ')' | '"')
                || (c == ',' && !self.decimal_comma)
            {
                break;
            }
            self.pos += 1;
        }
        let token: String = self.chars[start..self.pos].iter().collect();
        if token.is_empty() {
            return Err(self.error("expected an argument"));
        }

        self.skip_ws();
        if self.peek() == Some('(') {
            self.bump();
            return self.nested_call(&token, start);
        }

        if self.decimal_comma && token.contains(',') {
            return Ok(classify_decimal_comma(&token));
        }
        Ok(classify(&token))
    }

    fn nested_call(&mut self, name: &str, start: usize) -> Result<CellValue> {
        if !name.eq_ignore_ascii_case("DATE") {
            return Err(GranaError::FormulaError {
                position: start,
                message: format!("nested function {} is not supported", name),
            });
        }
        let args = self.arguments()?;
        date_from_args(&args)
            .map(CellValue::Date)
            .ok_or_else(|| GranaError::FormulaError {
                position: start,
                message: "DATE expects year, month and day of a valid date".to_string(),
            })
    }

    fn identifier(&mut self) -> Result<String> {
        let start = self.pos;
        match self.peek() {
            Some(c) if c.is_ascii_alphabetic() => {}
            _ => return Err(self.error("expected a function name")),
        }
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' || c == '.' {
                self.pos += 1;
            } else {
                break;
            }
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn error(&self, message: impl Into<String>) -> GranaError {
        GranaError::FormulaError {
            position: self.pos,
            message: message.into(),
        }
    }
}

fn classify(token: &str) -> CellValue {
    if token.eq_ignore_ascii_case("TRUE") {
        return CellValue::Bool(true);
    }
    if token.eq_ignore_ascii_case("FALSE") {
        return CellValue::Bool(false);
    }
    // f64::from_str 也接受 "inf"/"NaN"，只把數字開頭的視為數值
    let numeric_start = token
        .trim_start_matches(['+', '-'])
        .starts_with(|c: char| c.is_ascii_digit() || c == '.');
    if numeric_start {
        if let Ok(number) = token.parse::<f64>() {
            return CellValue::Number(number);
        }
    }
    CellValue::Text(token.to_string())
}

/// `5000,00` 是數值；`94,5%` 之類無法解析的保留原樣
fn classify_decimal_comma(token: &str) -> CellValue {
    match classify(&token.replace(',', ".")) {
        CellValue::Number(number) => CellValue::Number(number),
        _ => CellValue::Text(token.to_string()),
    }
}

fn date_from_args(args: &[CellValue]) -> Option<NaiveDate> {
    let [year, month, day] = args else {
        return None;
    };
    let part = |value: &CellValue| match value {
        CellValue::Number(n) if n.fract() == 0.0 => Some(*n as i64),
        _ => None,
    };
    let year = i32::try_from(part(year)?).ok()?;
    let month = u32::try_from(part(month)?).ok()?;
    let day = u32::try_from(part(day)?).ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}
