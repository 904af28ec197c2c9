use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalcError {
    #[error("division by zero ({0} / 0)")]
    DivisionByZero(f64),

    #[error("operand {0} is not a finite number")]
    NonFiniteOperand(f64),

    #[error("result of {op} is not a finite number")]
    NonFiniteResult { op: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Sum,
    Rest,
    Mult,
    Div,
}

impl Operation {
    pub fn verb(self) -> &'static str {
        match self {
            Operation::Sum => "adding",
            Operation::Rest => "subtracting",
            Operation::Mult => "multiplying",
            Operation::Div => "dividing",
        }
    }

    pub fn apply(self, a: f64, b: f64) -> Result<f64, CalcError> {
        match self {
            Operation::Sum => sum(a, b),
            Operation::Rest => rest(a, b),
            Operation::Mult => mult(a, b),
            Operation::Div => div(a, b),
        }
    }

    /// 例如 `The result of adding 2 and 3 is 5`
    pub fn describe(self, a: f64, b: f64) -> Result<String, CalcError> {
        let result = self.apply(a, b)?;
        Ok(format!(
            "The result of {} {} and {} is {}",
            self.verb(),
            a,
            b,
            result
        ))
    }
}

fn checked(op: &'static str, a: f64, b: f64, f: impl Fn(f64, f64) -> f64) -> Result<f64, CalcError> {
    for v in [a, b] {
        if !v.is_finite() {
            return Err(CalcError::NonFiniteOperand(v));
        }
    }
    let result = f(a, b);
    if result.is_finite() {
        Ok(result)
    } else {
        Err(CalcError::NonFiniteResult { op })
    }
}

pub fn sum(a: f64, b: f64) -> Result<f64, CalcError> {
    checked("sum", a, b, |a, b| a + b)
}

pub fn rest(a: f64, b: f64) -> Result<f64, CalcError> {
    checked("rest", a, b, |a, b| a - b)
}

pub fn mult(a: f64, b: f64) -> Result<f64, CalcError> {
    checked("mult", a, b, |a, b| a * b)
}

pub fn div(a: f64, b: f64) -> Result<f64, CalcError> {
    if b == 0.0 && a.is_finite() {
        return Err(CalcError::DivisionByZero(a));
    }
    checked("div", a, b, |a, b| a / b)
}
