macro_rules! bang_operators {
    ($($variant:ident => $name:literal,)*) => {
        /// The closed set of built-in `!operator` names.
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
        pub enum BangOperator {
            $($variant,)*
        }

        impl BangOperator {
            pub const ALL: &'static [BangOperator] = &[$(BangOperator::$variant,)*];

            /// Looks up an operator by its name without the leading `!`.
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $($name => Some(BangOperator::$variant),)*
                    _ => None,
                }
            }

            /// The operator name without the leading `!`.
            pub const fn name(self) -> &'static str {
                match self {
                    $(BangOperator::$variant => $name,)*
                }
            }
        }
    };
}

bang_operators! {
    Add => "add",
    And => "and",
    Cast => "cast",
    Con => "con",
    Dag => "dag",
    Div => "div",
    Empty => "empty",
    Eq => "eq",
    Exists => "exists",
    Filter => "filter",
    Find => "find",
    Foldl => "foldl",
    Foreach => "foreach",
    Ge => "ge",
    GetDagOp => "getdagop",
    GetOp => "getop",
    Gt => "gt",
    Head => "head",
    If => "if",
    Interleave => "interleave",
    Isa => "isa",
    Le => "le",
    ListConcat => "listconcat",
    ListRemove => "listremove",
    ListSplat => "listsplat",
    LogTwo => "logtwo",
    Lt => "lt",
    Mul => "mul",
    Ne => "ne",
    Not => "not",
    Or => "or",
    SetDagOp => "setdagop",
    SetOp => "setop",
    Shl => "shl",
    Size => "size",
    Sra => "sra",
    Srl => "srl",
    StrConcat => "strconcat",
    Sub => "sub",
    Subst => "subst",
    Substr => "substr",
    Tail => "tail",
    ToLower => "tolower",
    ToUpper => "toupper",
    Xor => "xor",
}

impl std::fmt::Display for BangOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "!{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::BangOperator;

    #[test]
    fn names_are_unique_and_round_trip() {
        assert_eq!(BangOperator::ALL.len(), 45);
        for &op in BangOperator::ALL {
            assert_eq!(BangOperator::from_name(op.name()), Some(op));
        }
    }

    #[test]
    fn cond_is_not_a_bang_operator() {
        assert_eq!(BangOperator::from_name("cond"), None);
        assert_eq!(BangOperator::from_name("Add"), None);
        assert_eq!(BangOperator::GetDagOp.to_string(), "!getdagop");
    }
}
