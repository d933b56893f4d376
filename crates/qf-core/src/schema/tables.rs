//! Table declarations

/// Column storage type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    Integer,
    /// Bounded string; the bound is enforced with a check constraint
    VarChar(u32),
    Text,
    DateTime,
}

impl SqlType {
    pub fn sql(&self) -> String {
        match self {
            SqlType::Integer => "INTEGER".to_string(),
            SqlType::VarChar(n) => format!("VARCHAR({})", n),
            SqlType::Text => "TEXT".to_string(),
            SqlType::DateTime => "DATETIME".to_string(),
        }
    }

    pub fn max_len(&self) -> Option<u32> {
        match self {
            SqlType::VarChar(n) => Some(*n),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: &'static str,
    pub sql_type: SqlType,
    pub nullable: bool,
    pub unique: bool,
}

impl ColumnDef {
    const fn required(name: &'static str, sql_type: SqlType) -> Self {
        Self {
            name,
            sql_type,
            nullable: false,
            unique: false,
        }
    }

    const fn optional(name: &'static str, sql_type: SqlType) -> Self {
        Self {
            name,
            sql_type,
            nullable: true,
            unique: false,
        }
    }

    const fn unique(name: &'static str, sql_type: SqlType) -> Self {
        Self {
            name,
            sql_type,
            nullable: false,
            unique: true,
        }
    }
}

/// A foreign key; every one in the schema is `ON DELETE CASCADE`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForeignKeyDef {
    pub column: &'static str,
    pub references: &'static str,
    pub referenced_column: &'static str,
}

impl ForeignKeyDef {
    const fn cascade(column: &'static str, references: &'static str) -> Self {
        Self {
            column,
            references,
            referenced_column: "id",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableDef {
    pub name: &'static str,
    pub columns: &'static [ColumnDef],
    pub primary_key: &'static [&'static str],
    pub foreign_keys: &'static [ForeignKeyDef],
}

impl TableDef {
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Foreign key columns that need their own index.
    ///
    /// The leading primary key column is already covered by the key's index.
    pub fn indexed_columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        let leading = self.primary_key.first().copied();
        self.foreign_keys
            .iter()
            .map(|fk| fk.column)
            .filter(move |c| Some(*c) != leading)
    }
}

pub const USERNAME_MAX: u32 = 150;
pub const PASSWORD_MAX: u32 = 200;
pub const EMAIL_MAX: u32 = 120;
pub const SUBJECT_MAX: u32 = 200;

const ID: ColumnDef = ColumnDef::required("id", SqlType::Integer);

pub const USER: TableDef = TableDef {
    name: "user",
    columns: &[
        ID,
        ColumnDef::unique("username", SqlType::VarChar(USERNAME_MAX)),
        ColumnDef::required("password", SqlType::VarChar(PASSWORD_MAX)),
        ColumnDef::unique("email", SqlType::VarChar(EMAIL_MAX)),
    ],
    primary_key: &["id"],
    foreign_keys: &[],
};

pub const QUESTION: TableDef = TableDef {
    name: "question",
    columns: &[
        ID,
        ColumnDef::required("subject", SqlType::VarChar(SUBJECT_MAX)),
        ColumnDef::required("content", SqlType::Text),
        ColumnDef::required("create_date", SqlType::DateTime),
        ColumnDef::required("user_id", SqlType::Integer),
        ColumnDef::optional("modify_date", SqlType::DateTime),
    ],
    primary_key: &["id"],
    foreign_keys: &[ForeignKeyDef::cascade("user_id", "user")],
};

pub const ANSWER: TableDef = TableDef {
    name: "answer",
    columns: &[
        ID,
        ColumnDef::optional("question_id", SqlType::Integer),
        ColumnDef::required("content", SqlType::Text),
        ColumnDef::required("create_date", SqlType::DateTime),
        ColumnDef::required("user_id", SqlType::Integer),
        ColumnDef::optional("modify_date", SqlType::DateTime),
    ],
    primary_key: &["id"],
    foreign_keys: &[
        ForeignKeyDef::cascade("question_id", "question"),
        ForeignKeyDef::cascade("user_id", "user"),
    ],
};

pub const COMMENT: TableDef = TableDef {
    name: "comment",
    columns: &[
        ID,
        ColumnDef::required("user_id", SqlType::Integer),
        ColumnDef::required("content", SqlType::Text),
        ColumnDef::required("create_date", SqlType::DateTime),
        ColumnDef::optional("modify_date", SqlType::DateTime),
        ColumnDef::optional("question_id", SqlType::Integer),
        ColumnDef::optional("answer_id", SqlType::Integer),
    ],
    primary_key: &["id"],
    foreign_keys: &[
        ForeignKeyDef::cascade("user_id", "user"),
        ForeignKeyDef::cascade("question_id", "question"),
        ForeignKeyDef::cascade("answer_id", "answer"),
    ],
};

pub const QUESTION_VOTER: TableDef = TableDef {
    name: "question_voter",
    columns: &[
        ColumnDef::required("user_id", SqlType::Integer),
        ColumnDef::required("question_id", SqlType::Integer),
    ],
    primary_key: &["user_id", "question_id"],
    foreign_keys: &[
        ForeignKeyDef::cascade("user_id", "user"),
        ForeignKeyDef::cascade("question_id", "question"),
    ],
};

pub const ANSWER_VOTER: TableDef = TableDef {
    name: "answer_voter",
    columns: &[
        ColumnDef::required("user_id", SqlType::Integer),
        ColumnDef::required("answer_id", SqlType::Integer),
    ],
    primary_key: &["user_id", "answer_id"],
    foreign_keys: &[
        ForeignKeyDef::cascade("user_id", "user"),
        ForeignKeyDef::cascade("answer_id", "answer"),
    ],
};

/// All tables, referenced tables before the tables that point at them
pub const TABLES: [TableDef; 6] = [
    USER,
    QUESTION,
    ANSWER,
    COMMENT,
    QUESTION_VOTER,
    ANSWER_VOTER,
];

/// Look up a table by name
pub fn table(name: &str) -> Option<&'static TableDef> {
    TABLES.iter().find(|t| t.name == name)
}
