use crate::callable::Function;
use std::collections::BTreeMap;
use std::fmt;

/// Every value a program can produce.
#[derive(Debug, Clone)]
pub enum Value {
    Undefined,
    Null,
    Number(f64),
    String(String),
    Boolean(bool),
    Array(Vec<Value>),
    Object(BTreeMap<String, Value>),
    Function(Function),
}

impl Value {
    /// Only `undefined`, `null` and `false` are falsy. `0`, `""`, `[]` and
    /// `{}` are all truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Boolean(x) => *x,
            Value::Number(_)
            | Value::String(_)
            | Value::Array(_)
            | Value::Object(_)
            | Value::Function(_) => true,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Boolean(_) => "boolean",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Function(_) => "function",
        }
    }

    /// Like `Display`, but strings are quoted. Used for container elements.
    pub fn repr(&self) -> String {
        match self {
            Value::String(x) => format!("{:?}", x),
            _ => self.to_string(),
        }
    }
}

/// Values of different tags are never equal.
impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Null, Value::Null) => true,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => a.equals(b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Number(x) => write!(f, "{}", x),
            Value::String(x) => write!(f, "{}", x),
            Value::Boolean(x) => write!(f, "{}", x),
            Value::Array(values) => {
                let items: Vec<String> = values.iter().map(Value::repr).collect();
                write!(f, "[{}]", items.join(", "))
            }
            Value::Object(properties) if properties.is_empty() => write!(f, "{{}}"),
            Value::Object(properties) => {
                let items: Vec<String> = properties
                    .iter()
                    .map(|(k, v)| format!("{}: {}", k, v.repr()))
                    .collect();
                write!(f, "{{ {} }}", items.join(", "))
            }
            Value::Function(x) => write!(f, "{}", x),
        }
    }
}

#[cfg(test)]
mod value_tests {
    use crate::value::Value;
    use rstest::rstest;
    use std::collections::BTreeMap;

    #[rstest]
    #[case(Value::Number(0.0), true)]
    #[case(Value::String(String::new()), true)]
    #[case(Value::Array(vec![]), true)]
    #[case(Value::Object(BTreeMap::new()), true)]
    #[case(Value::Boolean(true), true)]
    #[case(Value::Undefined, false)]
    #[case(Value::Null, false)]
    #[case(Value::Boolean(false), false)]
    fn truthiness(#[case] value: Value, #[case] truthy: bool) {
        assert_eq!(value.is_truthy(), truthy);
    }

    #[test]
    fn cross_type_values_differ() {
        assert_ne!(Value::Number(1.0), Value::String("1".to_string()));
        assert_ne!(Value::Null, Value::Undefined);
        assert_ne!(Value::Boolean(false), Value::Number(0.0));
        assert_eq!(
            Value::Array(vec![Value::Number(1.0), Value::Null]),
            Value::Array(vec![Value::Number(1.0), Value::Null])
        );
    }

    #[test]
    fn display_forms() {
        let mut object = BTreeMap::new();
        object.insert("b".to_string(), Value::String("x".to_string()));
        object.insert("a".to_string(), Value::Number(2.5));
        let value = Value::Array(vec![
            Value::Number(5.0),
            Value::String("s".to_string()),
            Value::Object(object),
            Value::Object(BTreeMap::new()),
        ]);
        assert_eq!(value.to_string(), r#"[5, "s", { a: 2.5, b: "x" }, {}]"#);
        assert_eq!(Value::String("raw".to_string()).to_string(), "raw");
        assert_eq!(Value::Number(-0.5).to_string(), "-0.5");
    }
}
