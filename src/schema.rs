//! Column type descriptors.

use std::fmt;

/// Category tag of a [`TypeDescriptor`].
///
/// This is the full category set a columnar file schema can declare. Only
/// `Integer`, `Long`, `Double`, `String`, `List`, `Map` and `Struct` columns can be
/// written; see [`Category::is_writable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Category {
    /// Boolean.
    Boolean,
    /// 8-bit signed integer.
    Byte,
    /// 16-bit signed integer.
    Short,
    /// 32-bit signed integer.
    Integer,
    /// 64-bit signed integer.
    Long,
    /// 32-bit floating point.
    Float,
    /// 64-bit floating point.
    Double,
    /// UTF-8 string.
    String,
    /// Raw bytes.
    Binary,
    /// Timestamp.
    Timestamp,
    /// Calendar date.
    Date,
    /// Decimal.
    Decimal,
    /// Variable-length list with one element type.
    List,
    /// Key/value map.
    Map,
    /// Struct with named fields.
    Struct,
    /// Tagged union.
    Union,
}

impl Category {
    /// Whether column writers exist for this category.
    #[must_use]
    pub const fn is_writable(self) -> bool {
        match self {
            Category::Integer
            | Category::Long
            | Category::Double
            | Category::String
            | Category::List
            | Category::Map
            | Category::Struct => true,
            Category::Boolean
            | Category::Byte
            | Category::Short
            | Category::Float
            | Category::Binary
            | Category::Timestamp
            | Category::Date
            | Category::Decimal
            | Category::Union => false,
        }
    }

    /// Type-string name of the category (`bigint` for `Long`, `array` for `List`, ...).
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Category::Boolean => "boolean",
            Category::Byte => "tinyint",
            Category::Short => "smallint",
            Category::Integer => "int",
            Category::Long => "bigint",
            Category::Float => "float",
            Category::Double => "double",
            Category::String => "string",
            Category::Binary => "binary",
            Category::Timestamp => "timestamp",
            Category::Date => "date",
            Category::Decimal => "decimal",
            Category::List => "array",
            Category::Map => "map",
            Category::Struct => "struct",
            Category::Union => "uniontype",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Immutable schema node: a category, its ordered children and (for structs) field names.
///
/// Children carry meaning by position: one element type for `List`, `[key, value]` for
/// `Map`, one per field for `Struct`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TypeDescriptor {
    category: Category,
    children: Vec<TypeDescriptor>,
    field_names: Vec<String>,
}

impl TypeDescriptor {
    /// A childless descriptor of `category`.
    ///
    /// Container categories built this way have no children; use [`TypeDescriptor::list`],
    /// [`TypeDescriptor::map`] or [`TypeDescriptor::struct_of`] for those.
    #[must_use]
    pub fn new(category: Category) -> Self {
        Self {
            category,
            children: Vec::new(),
            field_names: Vec::new(),
        }
    }

    /// `int` column.
    #[must_use]
    pub fn integer() -> Self {
        Self::new(Category::Integer)
    }

    /// `bigint` column.
    #[must_use]
    pub fn long() -> Self {
        Self::new(Category::Long)
    }

    /// `double` column.
    #[must_use]
    pub fn double() -> Self {
        Self::new(Category::Double)
    }

    /// `string` column.
    #[must_use]
    pub fn string() -> Self {
        Self::new(Category::String)
    }

    /// `array<element>` column.
    #[must_use]
    pub fn list(element: TypeDescriptor) -> Self {
        Self {
            category: Category::List,
            children: vec![element],
            field_names: Vec::new(),
        }
    }

    /// `map<key,value>` column.
    #[must_use]
    pub fn map(key: TypeDescriptor, value: TypeDescriptor) -> Self {
        Self {
            category: Category::Map,
            children: vec![key, value],
            field_names: Vec::new(),
        }
    }

    /// `struct<..>` column with fields in the given order.
    pub fn struct_of<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = (S, TypeDescriptor)>,
        S: Into<String>,
    {
        let (field_names, children): (Vec<String>, Vec<TypeDescriptor>) = fields
            .into_iter()
            .map(|(name, child)| (name.into(), child))
            .unzip();
        Self {
            category: Category::Struct,
            children,
            field_names,
        }
    }

    /// The category tag.
    #[inline]
    #[must_use]
    pub fn category(&self) -> Category {
        self.category
    }

    /// Ordered child descriptors.
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[TypeDescriptor] {
        &self.children
    }

    /// Struct field names, parallel to [`TypeDescriptor::children`]. Empty for other categories.
    #[inline]
    #[must_use]
    pub fn field_names(&self) -> &[String] {
        &self.field_names
    }

    /// Iterate `(name, child)` pairs of a struct descriptor.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &TypeDescriptor)> {
        self.field_names
            .iter()
            .map(String::as_str)
            .zip(self.children.iter())
    }

    /// Columns of a batch written with this schema.
    ///
    /// A struct root contributes one column per field; any other root is a single
    /// column named `_col0`.
    #[must_use]
    pub fn top_level_columns(&self) -> Vec<(String, &TypeDescriptor)> {
        match self.category {
            Category::Struct => self
                .fields()
                .map(|(name, child)| (name.to_string(), child))
                .collect(),
            _ => vec![("_col0".to_string(), self)],
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.category {
            Category::List | Category::Map | Category::Union => {
                write!(f, "{}<", self.category)?;
                for (i, child) in self.children.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{child}")?;
                }
                f.write_str(">")
            }
            Category::Struct => {
                f.write_str("struct<")?;
                for (i, (name, child)) in self.fields().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{name}:{child}")?;
                }
                f.write_str(">")
            }
            other => f.write_str(other.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_type_string() {
        let schema = TypeDescriptor::struct_of([
            ("a", TypeDescriptor::string()),
            ("b", TypeDescriptor::list(TypeDescriptor::long())),
            (
                "c",
                TypeDescriptor::map(TypeDescriptor::string(), TypeDescriptor::double()),
            ),
        ]);
        assert_eq!(
            schema.to_string(),
            "struct<a:string,b:array<bigint>,c:map<string,double>>"
        );
    }

    #[test]
    fn non_struct_root_is_single_column() {
        let long = TypeDescriptor::long();
        let cols = long.top_level_columns();
        assert_eq!(cols.len(), 1);
        assert_eq!(cols[0].0, "_col0");
        assert_eq!(cols[0].1.category(), Category::Long);
    }

    #[test]
    fn writable_set() {
        assert!(Category::Integer.is_writable());
        assert!(Category::Struct.is_writable());
        assert!(!Category::Binary.is_writable());
        assert!(!Category::Timestamp.is_writable());
    }
}
