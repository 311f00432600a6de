use crate::{ast::*, visitor::Visitor};
use std::fmt::{self, Write};

/// A visitor to generate queries for the PostgreSQL database.
///
/// The returned parameter values implement the `ToSql` trait from postgres
/// when the `postgresql-native` feature is enabled.
pub struct Postgres<'a> {
    query: String,
    parameters: Vec<Value<'a>>,
}

impl<'a> Visitor<'a> for Postgres<'a> {
    const C_QUOTE: &'static str = "\"";

    fn build<Q>(query: Q) -> crate::Result<(String, Vec<Value<'a>>)>
    where
        Q: Into<Query<'a>>,
    {
        let mut postgres = Postgres {
            query: String::with_capacity(256),
            parameters: Vec::with_capacity(16),
        };

        Postgres::visit_query(&mut postgres, query.into())?;

        tracing::trace!(
            query = %postgres.query,
            params = %Params(&postgres.parameters),
            "rendered statement"
        );

        Ok((postgres.query, postgres.parameters))
    }

    fn write<D: fmt::Display>(&mut self, s: D) -> super::Result {
        write!(&mut self.query, "{s}")?;
        Ok(())
    }

    fn add_parameter(&mut self, value: Value<'a>) {
        self.parameters.push(value);
    }

    fn parameter_substitution(&mut self) -> super::Result {
        self.write("$")?;
        self.write(self.parameters.len())
    }

    fn visit_insert(&mut self, insert: Insert<'a>) -> super::Result {
        self.write("INSERT INTO ")?;
        self.visit_table(insert.table)?;

        if insert.columns.is_empty() {
            self.write(" DEFAULT VALUES")?;
        } else {
            self.write(" ")?;
            self.surround_with("(", ")", |ref mut s| s.visit_columns(insert.columns))?;
            self.write(" VALUES ")?;
            self.surround_with("(", ")", |ref mut s| s.visit_values(insert.values))?;
        }

        match insert.on_conflict {
            Some(OnConflict::DoNothing { constraint }) => {
                self.write(" ON CONFLICT")?;
                self.visit_conflict_target(constraint)?;
                self.write(" DO NOTHING")?;
            }
            Some(OnConflict::DoUpdate { constraint, columns }) => {
                self.write(" ON CONFLICT")?;
                self.visit_conflict_target(constraint)?;
                self.write(" DO UPDATE SET ")?;

                let len = columns.len();

                for (i, column) in columns.into_iter().enumerate() {
                    self.visit_column(column.clone())?;
                    self.write(" = EXCLUDED.")?;
                    self.visit_column(column)?;

                    if i < (len - 1) {
                        self.write(", ")?;
                    }
                }
            }
            None => (),
        }

        if let Some(returning) = insert.returning {
            if !returning.is_empty() {
                self.write(" RETURNING ")?;
                self.visit_columns(returning)?;
            }
        }

        Ok(())
    }
}

impl<'a> Postgres<'a> {
    fn visit_conflict_target(&mut self, constraint: Vec<Column<'a>>) -> super::Result {
        if constraint.is_empty() {
            return Ok(());
        }

        self.write(" ")?;
        self.surround_with("(", ")", |ref mut s| s.visit_columns(constraint))
    }
}

#[cfg(test)]
mod tests {
    use crate::visitor::*;
    use expect_test::expect;
    use pretty_assertions::assert_eq;

    fn expected_values<'a, T>(sql: &'static str, params: Vec<T>) -> (String, Vec<Value<'a>>)
    where
        T: Into<Value<'a>>,
    {
        (String::from(sql), params.into_iter().map(|p| p.into()).collect())
    }

    #[test]
    fn select_star_from() {
        let (sql, params) = Postgres::build(Select::from_table("musti")).unwrap();

        assert_eq!(r#"SELECT * FROM "musti""#, sql);
        assert!(params.is_empty());
    }

    #[test]
    fn select_with_schema() {
        let query = Select::from_table(("cat", "musti")).column("paw");
        let (sql, _) = Postgres::build(query).unwrap();

        assert_eq!(r#"SELECT "paw" FROM "cat"."musti""#, sql);
    }

    #[test]
    fn select_where_single_equals_is_parenthesized() {
        let expected = expected_values(r#"SELECT "id" FROM "foo" WHERE ("bar" = $1)"#, vec!["baz"]);

        let query = Select::from_table("foo").column("id").so_that("bar".equals("baz"));
        let (sql, params) = Postgres::build(query).unwrap();

        assert_eq!(expected.0, sql);
        assert_eq!(expected.1, params);
    }

    #[test]
    fn select_where_conjunction_numbers_parameters_in_order() {
        let conditions = "bar_0"
            .equals("baz0")
            .and("bar_1".equals("baz1"))
            .and("bar_2".equals("baz2"));

        let query = Select::from_table("foo").column("id").so_that(conditions);
        let (sql, params) = Postgres::build(query).unwrap();

        expect![[r#"SELECT "id" FROM "foo" WHERE ("bar_0" = $1 AND "bar_1" = $2 AND "bar_2" = $3)"#]]
            .assert_eq(&sql);
        assert_eq!(
            vec![Value::from("baz0"), Value::from("baz1"), Value::from("baz2")],
            params
        );
    }

    #[test]
    fn empty_condition_tree_is_always_true() {
        let query = Select::from_table("foo").so_that(ConditionTree::NoCondition);
        let (sql, _) = Postgres::build(query).unwrap();

        assert_eq!(r#"SELECT * FROM "foo" WHERE 1=1"#, sql);
    }

    #[test]
    fn identifiers_with_quotes_are_escaped() {
        let query = Select::from_table(r#"we"ird"#).column(r#"co"l"#);
        let (sql, _) = Postgres::build(query).unwrap();

        assert_eq!(r#"SELECT "co""l" FROM "we""ird""#, sql);
    }

    #[test]
    fn values_are_never_written_into_the_query() {
        let query = Insert::single_into("foo").value("bar", "'; DROP TABLE foo; --");
        let (sql, params) = Postgres::build(query).unwrap();

        assert_eq!(r#"INSERT INTO "foo" ("bar") VALUES ($1)"#, sql);
        assert_eq!(vec![Value::from("'; DROP TABLE foo; --")], params);
    }

    #[test]
    fn insert_on_conflict_do_update_returning() {
        let insert = Insert::single_into("foo")
            .value("bar", "baz")
            .value("qux", "quux")
            .build()
            .on_conflict(OnConflict::do_update(["bar"], ["qux"]))
            .returning(["id"]);

        let (sql, params) = Postgres::build(insert).unwrap();

        expect![[r#"INSERT INTO "foo" ("bar", "qux") VALUES ($1, $2) ON CONFLICT ("bar") DO UPDATE SET "qux" = EXCLUDED."qux" RETURNING "id""#]]
            .assert_eq(&sql);
        assert_eq!(vec![Value::from("baz"), Value::from("quux")], params);
    }

    #[test]
    fn insert_on_conflict_do_update_several_columns() {
        let insert = Insert::single_into("foo")
            .value("a", 1)
            .value("b", 2)
            .value("c", 3)
            .build()
            .on_conflict(OnConflict::do_update(["a"], ["b", "c"]));

        let (sql, _) = Postgres::build(insert).unwrap();

        assert_eq!(
            r#"INSERT INTO "foo" ("a", "b", "c") VALUES ($1, $2, $3) ON CONFLICT ("a") DO UPDATE SET "b" = EXCLUDED."b", "c" = EXCLUDED."c""#,
            sql
        );
    }

    #[test]
    fn insert_on_conflict_do_nothing() {
        let insert = Insert::single_into("foo")
            .value("bar", "baz")
            .build()
            .on_conflict(OnConflict::do_nothing(["bar"]));

        let (sql, params) = Postgres::build(insert).unwrap();

        assert_eq!(
            r#"INSERT INTO "foo" ("bar") VALUES ($1) ON CONFLICT ("bar") DO NOTHING"#,
            sql
        );
        assert_eq!(vec![Value::from("baz")], params);
    }

    #[test]
    fn insert_on_conflict_without_target() {
        let insert = Insert::single_into("foo")
            .value("bar", "baz")
            .build()
            .on_conflict(OnConflict::do_nothing(Vec::<Column>::new()));

        let (sql, _) = Postgres::build(insert).unwrap();

        assert_eq!(r#"INSERT INTO "foo" ("bar") VALUES ($1) ON CONFLICT DO NOTHING"#, sql);
    }

    #[test]
    fn null_values_are_still_parameters() {
        let insert = Insert::single_into("foo").value("bar", Value::Int64(None));
        let (sql, params) = Postgres::build(insert).unwrap();

        assert_eq!(r#"INSERT INTO "foo" ("bar") VALUES ($1)"#, sql);
        assert_eq!(vec![Value::Int64(None)], params);
    }
}
