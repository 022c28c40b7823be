//! Declarative mapping tables from Java library types/methods to Python
//! idioms. Pure data: every function here is a total lookup with no side
//! effects.

/// How a mapped instance method renders at the call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodIdiom {
    /// `owner.mapped(args)`
    Rename(&'static str),
    /// `owner[k]`
    GetItem,
    /// `owner[k] = v`
    SetItem,
    /// `arg in owner`
    Contains,
    /// `all(item in owner for item in arg)`
    ContainsAll,
    /// `arg in owner.values()`
    ContainsValue,
    /// `len(owner)`
    Len,
    /// `(not owner)`
    NotEmpty,
    /// `owner.pop(0)`
    PopFront,
    /// `owner[0]`
    Peek,
    /// `owner[a:b]`
    Slice,
    /// `list(map(f, owner))`
    ForEach,
    /// `owner.extend(arg)`
    Extend,
    /// `owner.update(arg)` (set/map add-all semantics)
    Update,
}

/// Coarse collection family, used to pick constructor literals and
/// add-all semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionKind {
    List,
    Set,
    Map,
    Deque,
    PriorityQueue,
}

/// Extract the short base name of a Java type: `List<String>` -> `List`,
/// `java.util.Map` -> `Map`, `int` -> `int`.
pub fn short_base_type(java_type: &str) -> Option<&str> {
    let mut s = java_type.trim();
    if let Some(idx) = s.find('<') {
        s = &s[..idx];
    }
    if let Some(idx) = s.rfind('.') {
        s = &s[idx + 1..];
    }
    let s = s.trim();
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

pub fn collection_kind(type_name: &str) -> Option<CollectionKind> {
    let short = short_base_type(type_name)?;
    match short {
        "List" | "ArrayList" | "Vector" | "Stack" => Some(CollectionKind::List),
        "Set" | "HashSet" | "TreeSet" | "LinkedHashSet" => Some(CollectionKind::Set),
        "Map" | "HashMap" | "TreeMap" | "LinkedHashMap" => Some(CollectionKind::Map),
        "Queue" | "Deque" | "ArrayDeque" | "LinkedList" => Some(CollectionKind::Deque),
        "PriorityQueue" => Some(CollectionKind::PriorityQueue),
        _ if short.ends_with("List") => Some(CollectionKind::List),
        _ if short.ends_with("Set") => Some(CollectionKind::Set),
        _ if short.ends_with("Map") => Some(CollectionKind::Map),
        _ if short.ends_with("Deque") => Some(CollectionKind::Deque),
        _ => None,
    }
}

/// Instance-method idiom for a coarse declared type.
pub fn instance_idiom(owner_type: &str, method: &str) -> Option<MethodIdiom> {
    use MethodIdiom::*;
    let short = short_base_type(owner_type)?;
    let kind = collection_kind(short);
    match (kind, method) {
        (Some(CollectionKind::List), "add") => Some(Rename("append")),
        (Some(CollectionKind::List), "addAll") => Some(Extend),
        (Some(CollectionKind::List), "get") => Some(GetItem),
        (Some(CollectionKind::List), "set") => Some(SetItem),
        (Some(CollectionKind::List), "remove") => Some(Rename("remove")),
        (Some(CollectionKind::List), "indexOf") => Some(Rename("index")),
        (Some(CollectionKind::List), "subList") => Some(Slice),
        (Some(CollectionKind::List), "sort") => Some(Rename("sort")),
        (Some(CollectionKind::List), "clear") => Some(Rename("clear")),

        (Some(CollectionKind::Set), "add") => Some(Rename("add")),
        (Some(CollectionKind::Set), "addAll") => Some(Update),
        (Some(CollectionKind::Set), "remove") => Some(Rename("remove")),
        (Some(CollectionKind::Set), "retainAll") => Some(Rename("intersection_update")),
        (Some(CollectionKind::Set), "clear") => Some(Rename("clear")),

        (Some(CollectionKind::Map), "put") => Some(SetItem),
        (Some(CollectionKind::Map), "putIfAbsent") => Some(Rename("setdefault")),
        (Some(CollectionKind::Map), "get") => Some(Rename("get")),
        (Some(CollectionKind::Map), "getOrDefault") => Some(Rename("get")),
        (Some(CollectionKind::Map), "remove") => Some(Rename("pop")),
        (Some(CollectionKind::Map), "containsKey") => Some(Contains),
        (Some(CollectionKind::Map), "containsValue") => Some(ContainsValue),
        (Some(CollectionKind::Map), "keySet") => Some(Rename("keys")),
        (Some(CollectionKind::Map), "values") => Some(Rename("values")),
        (Some(CollectionKind::Map), "entrySet") => Some(Rename("items")),
        (Some(CollectionKind::Map), "putAll") => Some(Update),
        (Some(CollectionKind::Map), "clear") => Some(Rename("clear")),

        (Some(CollectionKind::Deque), "add" | "addLast" | "offer") => Some(Rename("append")),
        (Some(CollectionKind::Deque), "addFirst") => Some(Rename("appendleft")),
        (Some(CollectionKind::Deque), "poll" | "pollFirst" | "removeFirst") => {
            Some(Rename("popleft"))
        }
        (Some(CollectionKind::Deque), "pollLast" | "removeLast") => Some(Rename("pop")),
        (Some(CollectionKind::Deque), "peek") => Some(Peek),

        (Some(CollectionKind::PriorityQueue), "add" | "offer") => Some(Rename("append")),
        (Some(CollectionKind::PriorityQueue), "poll") => Some(PopFront),
        (Some(CollectionKind::PriorityQueue), "peek") => Some(Peek),

        // Family-independent methods shared by every collection entry.
        (Some(_), "size") => Some(Len),
        (Some(_), "isEmpty") => Some(NotEmpty),
        (Some(_), "contains") => Some(Contains),
        (Some(_), "containsAll") => Some(ContainsAll),
        (Some(_), "forEach") => Some(ForEach),
        (Some(_), "iterator") => Some(Rename("iter")),

        (None, _) => match (short, method) {
            ("StringJoiner", "add") => Some(Rename("append")),
            ("Properties", "getProperty") => Some(Rename("get")),
            ("Properties", "setProperty") => Some(Rename("setdefault")),
            ("Random", "nextInt") => Some(Rename("randint")),
            _ => None,
        },
        _ => None,
    }
}

/// Fallback idiom table consulted when the owner's coarse type is unknown.
pub fn common_idiom(method: &str) -> Option<MethodIdiom> {
    use MethodIdiom::*;
    match method {
        "add" => Some(Rename("append")),
        "addAll" => Some(Extend),
        "remove" => Some(Rename("remove")),
        "get" => Some(GetItem),
        "put" => Some(SetItem),
        "size" | "length" => Some(Len),
        "isEmpty" => Some(NotEmpty),
        "contains" => Some(Contains),
        "containsAll" => Some(ContainsAll),
        "iterator" => Some(Rename("iter")),
        "forEach" => Some(ForEach),
        _ => None,
    }
}

/// Static-call template: `{args}` is replaced with the comma-joined argument
/// list. Returns the rendered template plus the Python module it needs, if
/// any.
pub fn static_template(class: &str, method: &str) -> Option<(&'static str, Option<&'static str>)> {
    let short = short_base_type(class).unwrap_or(class);
    match (short, method) {
        ("Math", "max") => Some(("max({args})", None)),
        ("Math", "min") => Some(("min({args})", None)),
        ("Math", "abs") => Some(("abs({args})", None)),
        ("Math", "pow") => Some(("pow({args})", None)),
        ("Math", "sqrt") => Some(("math.sqrt({args})", Some("import math"))),
        ("Math", "ceil") => Some(("math.ceil({args})", Some("import math"))),
        ("Math", "floor") => Some(("math.floor({args})", Some("import math"))),
        ("Math", "random") => Some(("random.random()", Some("import random"))),
        ("List", "of") => Some(("[{args}]", None)),
        ("Arrays", "asList") => Some(("[{args}]", None)),
        ("Arrays", "copyOf") => Some(("list({args})", None)),
        ("Arrays", "sort") => Some(("sorted({args})", None)),
        ("Arrays", "toString") => Some(("str({args})", None)),
        ("Collections", "sort") => Some(("{args}.sort()", None)),
        ("Collections", "reverse") => Some(("{args}.reverse()", None)),
        ("Collections", "shuffle") => Some(("random.shuffle({args})", Some("import random"))),
        ("Collections", "emptyList") => Some(("[]", None)),
        ("Collections", "singletonList") => Some(("[{args}]", None)),
        ("Collections", "unmodifiableList") => Some(("tuple({args})", None)),
        ("Collections", "max") => Some(("max({args})", None)),
        ("Collections", "min") => Some(("min({args})", None)),
        ("Objects", "requireNonNull") => Some(("assert {args} is not None", None)),
        ("Objects", "hash") => Some(("hash({args})", None)),
        ("String", "valueOf") => Some(("str({args})", None)),
        ("Integer", "parseInt") => Some(("int({args})", None)),
        ("Long", "parseLong") => Some(("int({args})", None)),
        ("Double", "parseDouble") => Some(("float({args})", None)),
        ("UUID", "randomUUID") => Some(("uuid.uuid4()", Some("import uuid"))),
        ("UUID", "fromString") => Some(("uuid.UUID({args})", Some("import uuid"))),
        ("Instant", "now") => Some(("datetime.datetime.now()", Some("import datetime"))),
        _ => None,
    }
}

/// Closed-form lambda body for well-known method references
/// (`Owner::method` applied to a single bound variable).
pub fn method_ref_body(owner: &str, method: &str, var: &str) -> Option<String> {
    match (owner, method) {
        ("String", "valueOf") => Some(format!("str({var})")),
        ("String", "trim") => Some(format!("{var}.strip()")),
        ("Integer", "parseInt") => Some(format!("int({var})")),
        ("Long", "parseLong") => Some(format!("int({var})")),
        ("Double", "parseDouble") => Some(format!("float({var})")),
        ("Objects", "nonNull") => Some(format!("{var} is not None")),
        ("Objects", "isNull") => Some(format!("{var} is None")),
        (_, "toString") => Some(format!("str({var})")),
        (_, "length") => Some(format!("len({var})")),
        _ => None,
    }
}

/// Map a caught/thrown Java exception's short name to the Python builtin.
/// Unknown names pass through unchanged; empty input falls back to
/// `Exception`.
pub fn map_exception(java_name: &str) -> &str {
    let short = java_name.rsplit('.').next().unwrap_or(java_name).trim();
    match short {
        "IllegalArgumentException" => "ValueError",
        "IllegalStateException" => "RuntimeError",
        "NullPointerException" => "TypeError",
        "IndexOutOfBoundsException" => "IndexError",
        "ArrayIndexOutOfBoundsException" => "IndexError",
        "NumberFormatException" => "ValueError",
        "UnsupportedOperationException" => "NotImplementedError",
        "IOException" | "FileNotFoundException" => "OSError",
        "InterruptedException" => "KeyboardInterrupt",
        "RuntimeException" | "Exception" | "Throwable" => "Exception",
        "" => "Exception",
        other => other,
    }
}

/// Map a Java type to a Python annotation, for record components and static
/// field annotations. Arrays and one level of generics are handled.
pub fn map_type(java_type: &str) -> Option<String> {
    let jt = java_type.trim();
    if jt.is_empty() {
        return None;
    }
    if let Some(base) = jt.strip_suffix("[]") {
        let inner = map_type(base).unwrap_or_else(|| "Any".to_string());
        return Some(format!("list[{inner}]"));
    }
    if let (Some(open), Some(close)) = (jt.find('<'), jt.rfind('>')) {
        if open < close {
            let base = jt[..open].trim();
            let inner_src = jt[open + 1..close].split(',').next().unwrap_or("").trim();
            let inner = map_type(inner_src).unwrap_or_else(|| "Any".to_string());
            let short = short_base_type(base)?;
            return Some(match collection_kind(short) {
                Some(CollectionKind::List) => format!("list[{inner}]"),
                Some(CollectionKind::Set) => format!("set[{inner}]"),
                Some(CollectionKind::Map) => format!("dict[{inner}, Any]"),
                Some(CollectionKind::Deque) => "collections.deque".to_string(),
                Some(CollectionKind::PriorityQueue) => format!("list[{inner}]"),
                None => format!("{short}[{inner}]"),
            });
        }
    }
    let short = short_base_type(jt)?;
    let mapped = match short {
        "int" | "Integer" | "long" | "Long" | "short" | "byte" => "int",
        "double" | "Double" | "float" | "Float" => "float",
        "boolean" | "Boolean" => "bool",
        "char" | "Character" | "String" | "CharSequence" => "str",
        "Object" => "Any",
        "void" => "None",
        other => match collection_kind(other) {
            Some(CollectionKind::List) => "list",
            Some(CollectionKind::Set) => "set",
            Some(CollectionKind::Map) => "dict",
            Some(CollectionKind::Deque) => "collections.deque",
            Some(CollectionKind::PriorityQueue) => "list",
            None => other,
        },
    };
    Some(mapped.to_string())
}

/// Python reserved words; colliding parameter names get a trailing
/// underscore.
pub const PYTHON_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class", "continue",
    "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if", "import",
    "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try", "while",
    "with", "yield",
];

pub fn is_python_keyword(name: &str) -> bool {
    PYTHON_KEYWORDS.contains(&name)
}
