use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

use crate::errors::CaseResult;

/// A zero-argument body that can be handed to `expect` and checked with
/// `to_throw`. Two callables are equal only if they share the same body.
#[derive(Clone)]
pub struct Callable {
    name: String,
    body: Rc<dyn Fn() -> CaseResult<Value>>,
}

impl Callable {
    pub fn new<F>(name: impl Into<String>, body: F) -> Self
    where
        F: Fn() -> CaseResult<Value> + 'static,
    {
        Self {
            name: name.into(),
            body: Rc::new(body),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invokes the body. Panics are not caught here.
    pub fn invoke(&self) -> CaseResult<Value> {
        (self.body)()
    }

    fn same_body(&self, other: &Callable) -> bool {
        Rc::as_ptr(&self.body) as *const () == Rc::as_ptr(&other.body) as *const ()
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Callable({})", self.name)
    }
}

impl PartialEq for Callable {
    fn eq(&self, other: &Self) -> bool {
        self.same_body(other)
    }
}

/// Represents an actual or expected value inside an assertion.
///
/// Comparisons follow loosely-typed scripting semantics: [`Value::strict_eq`]
/// distinguishes `1` from `"1"`, [`Value::loose_eq`] coerces them.
///
/// # Examples
///
/// ```rust
/// use specunit::value::Value;
/// let one = Value::from(1);
/// let text = Value::from("1");
/// assert!(!one.strict_eq(&text));
/// assert!(one.loose_eq(&text));
/// assert_eq!(Value::default().type_name(), "undefined");
/// ```
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    List(Rc<Vec<Value>>),
    Function(Callable),
}

impl Value {
    /// Builds a function value from a closure.
    pub fn function<F>(name: impl Into<String>, body: F) -> Self
    where
        F: Fn() -> CaseResult<Value> + 'static,
    {
        Value::Function(Callable::new(name, body))
    }

    pub fn list<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Value::List(Rc::new(items.into_iter().map(Into::into).collect()))
    }

    /// Returns the type name of the value as a string.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use specunit::value::Value;
    /// assert_eq!(Value::from(true).type_name(), "boolean");
    /// assert_eq!(Value::list([1, 2]).type_name(), "list");
    /// ```
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Function(_) => "function",
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_callable(&self) -> Option<&Callable> {
        match self {
            Value::Function(c) => Some(c),
            _ => None,
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => !(n.is_nan() || *n == 0.0),
            Value::String(s) => !s.is_empty(),
            Value::List(_) | Value::Function(_) => true,
        }
    }

    /// Numeric coercion. Anything that does not read as a number is `NaN`.
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Undefined | Value::Function(_) => f64::NAN,
            Value::Null => 0.0,
            Value::Bool(b) => f64::from(u8::from(*b)),
            Value::Number(n) => *n,
            Value::String(s) => parse_number(s),
            Value::List(_) => parse_number(&self.to_js_string()),
        }
    }

    /// String coercion, the form used when values are concatenated into text.
    pub fn to_js_string(&self) -> String {
        match self {
            Value::Undefined => "undefined".to_string(),
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => format_number(*n),
            Value::String(s) => s.clone(),
            Value::List(items) => items
                .iter()
                .map(|v| match v {
                    Value::Undefined | Value::Null => String::new(),
                    other => other.to_js_string(),
                })
                .collect::<Vec<_>>()
                .join(","),
            Value::Function(c) => format!("function {}() {{ [native code] }}", c.name()),
        }
    }

    /// Diagnostic rendering: strings are quoted so `1` and `"1"` differ.
    pub fn repr(&self) -> String {
        match self {
            Value::String(s) => format!("{s:?}"),
            Value::List(items) => {
                let inner: Vec<_> = items.iter().map(Value::repr).collect();
                format!("[{}]", inner.join(", "))
            }
            Value::Function(c) if c.name().is_empty() => "[Function (anonymous)]".to_string(),
            Value::Function(c) => format!("[Function {}]", c.name()),
            other => other.to_js_string(),
        }
    }

    /// Strict equality: same type and same value; lists and functions by identity.
    pub fn strict_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => Rc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => a == b,
            _ => false,
        }
    }

    /// Loose equality with type coercion.
    pub fn loose_eq(&self, other: &Value) -> bool {
        use Value::*;
        match (self, other) {
            (Undefined | Null, Undefined | Null) => true,
            (Undefined | Null, _) | (_, Undefined | Null) => false,
            (Number(a), String(_)) => *a == other.to_number(),
            (String(_), Number(b)) => self.to_number() == *b,
            (Bool(_), _) => Number(self.to_number()).loose_eq(other),
            (_, Bool(_)) => self.loose_eq(&Number(other.to_number())),
            (Number(_) | String(_), List(_)) => self.loose_eq(&String(other.to_js_string())),
            (List(_), Number(_) | String(_)) => String(self.to_js_string()).loose_eq(other),
            _ => self.strict_eq(other),
        }
    }

    /// Relational comparison; `None` when the operands are unordered (NaN involved).
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        let left = self.to_primitive();
        let right = other.to_primitive();
        if let (Value::String(a), Value::String(b)) = (&left, &right) {
            return Some(a.cmp(b));
        }
        left.to_number().partial_cmp(&right.to_number())
    }

    fn to_primitive(&self) -> Value {
        match self {
            Value::List(_) | Value::Function(_) => Value::String(self.to_js_string()),
            other => other.clone(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.strict_eq(other)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_js_string())
    }
}

fn parse_number(text: &str) -> f64 {
    let s = text.trim();
    match s {
        "" => 0.0,
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        _ => {
            if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
                return u64::from_str_radix(hex, 16).map_or(f64::NAN, |n| n as f64);
            }
            // Rust accepts "inf" and "nan" spellings that do not read as numbers here.
            if s.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') {
                return f64::NAN;
            }
            s.parse::<f64>().unwrap_or(f64::NAN)
        }
    }
}

fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n == f64::INFINITY {
        "Infinity".to_string()
    } else if n == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else if n.abs() >= 1e21 || n.abs() < 1e-6 {
        // Host form: shortest mantissa, explicit sign on positive exponents.
        let sci = format!("{n:e}");
        match sci.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
            _ => sci,
        }
    } else if n.fract() == 0.0 {
        format!("{}", n as i128)
    } else {
        format!("{n}")
    }
}

// ============================================================================
// CONVERSIONS
// ============================================================================

macro_rules! impl_from_number {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(n: $t) -> Self {
                Value::Number(n as f64)
            }
        })*
    };
}

impl_from_number!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize, f32, f64);

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Value::String(c.to_string())
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Undefined
    }
}

impl From<Callable> for Value {
    fn from(c: Callable) -> Self {
        Value::Function(c)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::list(items)
    }
}

impl<T: Into<Value> + Clone> From<&[T]> for Value {
    fn from(items: &[T]) -> Self {
        Value::list(items.iter().cloned())
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Value {
    fn from(items: [T; N]) -> Self {
        Value::list(items)
    }
}

impl From<&Value> for Value {
    fn from(v: &Value) -> Self {
        v.clone()
    }
}
