//! Compile tests for the statement builders.

use super::*;
use crate::argument::{Argument, Operator, arg};
use crate::condition::Condition;
use crate::error::OrmResult;
use crate::ident::alias;
use crate::listener::Listen;
use crate::options::Options;
use crate::value::Value;

fn ints(v: &[i64]) -> Vec<Value> {
    v.iter().copied().map(Value::Int).collect()
}

fn compile(s: &mut Select) -> OrmResult<(String, Vec<Value>)> {
    s.to_sql()
}

// ==================== SELECT basics ====================

#[test]
fn full_select() {
    let mut s = Select::new(["a", "b"]);
    s.distinct()
        .from(alias("c", "cc"))
        .where_([
            Condition::parenthesis_open(),
            Condition::column("d", arg(1)),
            Condition::column("e", arg("wat")).or(),
            Condition::parenthesis_close(),
            Condition::column("f", arg(2)),
            Condition::column("g", arg(3)),
        ])
        .where_([Condition::column(
            "h",
            Argument::int64s([4, 5, 6]).operator(Operator::In),
        )])
        .group_by(["ab"])
        .having([
            Condition::parenthesis_open(),
            Condition::column("m", arg(33)),
            Condition::column("n", arg("wh3r3")).or(),
            Condition::parenthesis_close(),
            Condition::raw("j = k"),
        ])
        .order_by(["l"])
        .limit(7)
        .offset(8);

    let (sql, args) = compile(&mut s).unwrap();
    assert_eq!(
        sql,
        "SELECT DISTINCT a, b FROM `c` AS `cc` WHERE ((`d` = ?) OR (`e` = ?)) AND (`f` = ?) AND (`g` = ?) AND (`h` IN ?) GROUP BY ab HAVING ((`m` = ?) OR (`n` = ?)) AND (j = k) ORDER BY l LIMIT 7 OFFSET 8"
    );
    assert_eq!(
        args,
        vec![
            Value::Int(1),
            Value::String("wat".into()),
            Value::Int(2),
            Value::Int(3),
            Value::Int(4),
            Value::Int(5),
            Value::Int(6),
            Value::Int(33),
            Value::String("wh3r3".into()),
        ]
    );
}

#[test]
fn paginate_and_order_direction() {
    let mut s = select(["a", "b"]);
    s.from("c")
        .where_([Condition::raw_args("d = ?", [arg(1)])])
        .paginate(1, 20)
        .order_by_desc(["id"]);
    let (sql, args) = s.to_sql().unwrap();
    assert_eq!(
        sql,
        "SELECT a, b FROM `c` WHERE (d = ?) ORDER BY id DESC LIMIT 20 OFFSET 0"
    );
    assert_eq!(args, ints(&[1]));

    let mut s = select(["a", "b"]);
    s.from("c")
        .where_([Condition::raw_args("d = ?", [arg(1)])])
        .paginate(3, 30)
        .order_by(["id"]);
    assert_eq!(
        s.to_sql().unwrap().0,
        "SELECT a, b FROM `c` WHERE (d = ?) ORDER BY id LIMIT 30 OFFSET 60"
    );
}

#[test]
fn no_where() {
    let mut s = select(["a", "b"]);
    s.from("c");
    let (sql, args) = s.to_sql().unwrap();
    assert_eq!(sql, "SELECT a, b FROM `c`");
    assert!(args.is_empty());
}

#[test]
fn multi_having() {
    let mut s = select(["a", "b"]);
    s.from("c")
        .where_([Condition::raw_args("p = ?", [arg(1)])])
        .group_by(["z"])
        .having([
            Condition::raw_args("z = ?", [arg(2)]),
            Condition::raw_args("y = ?", [arg(3)]),
        ]);
    let (sql, args) = s.to_sql().unwrap();
    assert_eq!(
        sql,
        "SELECT a, b FROM `c` WHERE (p = ?) GROUP BY z HAVING (z = ?) AND (y = ?)"
    );
    assert_eq!(args, ints(&[1, 2, 3]));
}

#[test]
fn multi_order() {
    let mut s = select(["a", "b"]);
    s.from("c").order_by(["name ASC"]).order_by(["id DESC"]);
    assert_eq!(
        s.to_sql().unwrap().0,
        "SELECT a, b FROM `c` ORDER BY name ASC, id DESC"
    );
}

#[test]
fn column_varieties_compile_alike() {
    let mut a = select(["id, name, email"]);
    a.from("users");
    let mut b = select(["id", "name", "email"]);
    b.from("users");
    assert_eq!(a.to_sql().unwrap().0, b.to_sql().unwrap().0);
}

// ==================== column conditions ====================

#[test]
fn column_condition_operators() {
    let cases: Vec<(Argument, &str, Vec<Value>)> = vec![
        (arg(33i64), "(`d` = ?)", ints(&[33])),
        (
            Argument::int64s([33, 44]).operator(Operator::In),
            "(`d` IN ?)",
            ints(&[33, 44]),
        ),
        (
            Argument::float64s([33.0, 44.0]).operator(Operator::NotIn),
            "(`d` NOT IN ?)",
            vec![Value::Float(33.0), Value::Float(44.0)],
        ),
        (
            Argument::strings(["x", "y"]).operator(Operator::In),
            "(`d` IN ?)",
            vec![Value::String("x".into()), Value::String("y".into())],
        ),
        (
            Argument::int64s([5, 6]).operator(Operator::Between),
            "(`d` BETWEEN ? AND ?)",
            ints(&[5, 6]),
        ),
        (
            Argument::int64s([5, 6]).operator(Operator::NotBetween),
            "(`d` NOT BETWEEN ? AND ?)",
            ints(&[5, 6]),
        ),
        (
            arg("x%").operator(Operator::Like),
            "(`d` LIKE ?)",
            vec![Value::String("x%".into())],
        ),
        (
            arg("x%").operator(Operator::NotLike),
            "(`d` NOT LIKE ?)",
            vec![Value::String("x%".into())],
        ),
        (
            arg(5.1).operator(Operator::Less),
            "(`d` < ?)",
            vec![Value::Float(5.1)],
        ),
        (
            arg(5.1).operator(Operator::GreaterOrEqual),
            "(`d` >= ?)",
            vec![Value::Float(5.1)],
        ),
    ];

    for (argument, want_where, want_args) in cases {
        let mut s = select(["a", "b"]);
        s.from("c").where_([Condition::column("d", argument)]);
        let (sql, args) = s.to_sql().unwrap();
        assert_eq!(sql, format!("SELECT a, b FROM `c` WHERE {want_where}"));
        assert_eq!(args, want_args);
    }
}

#[test]
fn null_conditions() {
    let mut s = select(["a", "b"]);
    s.from("c").where_([
        Condition::expr("r", [Argument::null()]),
        Condition::expr("d = ?", [arg(3)]),
        Condition::column("ab", Argument::null()),
        Condition::column("w", Argument::not_null()),
    ]);
    let (sql, args) = s.to_sql().unwrap();
    assert_eq!(
        sql,
        "SELECT a, b FROM `c` WHERE (`r` IS NULL) AND (d = ?) AND (`ab` IS NULL) AND (`w` IS NOT NULL)"
    );
    assert_eq!(args, ints(&[3]));
}

#[test]
fn eq_map_keeps_input_order() {
    let mut s = select(["a"]);
    s.from("b").where_(Condition::eq_map([
        ("a", None),
        ("b", Some(arg(false))),
        ("c", Some(Argument::null())),
        ("d", Some(Argument::not_null())),
    ]));
    let (sql, args) = s.to_sql().unwrap();
    assert_eq!(
        sql,
        "SELECT a FROM `b` WHERE (`a` IS NULL) AND (`b` = ?) AND (`c` IS NULL) AND (`d` IS NOT NULL)"
    );
    assert_eq!(args, vec![Value::Bool(false)]);
}

#[test]
fn empty_list_matches_nothing() {
    let mut s = select(["a"]);
    s.from("b")
        .where_([Condition::column("a", Argument::int64s(Vec::new()))]);
    let (sql, args) = s.to_sql().unwrap();
    assert_eq!(sql, "SELECT a FROM `b` WHERE (`a` = ?)");
    assert!(args.is_empty());
}

// ==================== raw SQL ====================

#[test]
fn from_sql() {
    let (sql, args) = Select::from_sql("SELECT * FROM users WHERE x = 1", Vec::<Argument>::new())
        .to_sql()
        .unwrap();
    assert_eq!(sql, "SELECT * FROM users WHERE x = 1");
    assert!(args.is_empty());

    let mut s = Select::from_sql(
        "SELECT * FROM users WHERE x = ? AND y IN ?",
        [arg(9), Argument::int64s([5, 6, 7]).operator(Operator::In)],
    );
    let (sql, args) = s.to_sql().unwrap();
    assert_eq!(sql, "SELECT * FROM users WHERE x = ? AND y IN ?");
    assert_eq!(args, ints(&[9, 5, 6, 7]));

    // garbage in, garbage out
    let mut s = Select::from_sql("wat", [arg(9)]);
    assert_eq!(s.to_sql().unwrap(), ("wat".to_string(), ints(&[9])));
}

// ==================== joins and locks ====================

fn people_join() -> Vec<Condition> {
    vec![
        Condition::raw("`p2`.`id` = `p1`.`id`"),
        Condition::expr("p1.id", [arg(42)]),
    ]
}

#[test]
fn inner_join_with_modifiers() {
    let mut s = select(["p1.*", "p2.*"]);
    s.distinct()
        .straight_join()
        .sql_no_cache()
        .from(alias("dbr_people", "p1"))
        .join(alias("dbr_people", "p2"), people_join());
    let (sql, args) = s.to_sql().unwrap();
    assert_eq!(
        sql,
        "SELECT DISTINCT STRAIGHT_JOIN SQL_NO_CACHE p1.*, p2.* FROM `dbr_people` AS `p1` INNER JOIN `dbr_people` AS `p2` ON (`p2`.`id` = `p1`.`id`) AND (`p1`.`id` = ?)"
    );
    assert_eq!(args, ints(&[42]));
}

#[test]
fn left_join() {
    let mut s = select(["p1.*", "p2.name"]);
    s.from(alias("dbr_people", "p1"))
        .left_join(alias("dbr_people", "p2"), people_join());
    assert_eq!(
        s.to_sql().unwrap().0,
        "SELECT p1.*, p2.name FROM `dbr_people` AS `p1` LEFT JOIN `dbr_people` AS `p2` ON (`p2`.`id` = `p1`.`id`) AND (`p1`.`id` = ?)"
    );
}

#[test]
fn right_join_with_quoted_aliases() {
    let mut s = select(["p1.*"]);
    s.add_columns_quoted_alias(["p2.name", "p2Name", "p2.email", "p2Email", "id", "internalID"])
        .from(alias("dbr_people", "p1"))
        .right_join(
            alias("dbr_people", "p2"),
            [Condition::raw("`p2`.`id` = `p1`.`id`")],
        );
    assert_eq!(
        s.to_sql().unwrap().0,
        "SELECT p1.*, `p2`.`name` AS `p2Name`, `p2`.`email` AS `p2Email`, `id` AS `internalID` FROM `dbr_people` AS `p1` RIGHT JOIN `dbr_people` AS `p2` ON (`p2`.`id` = `p1`.`id`)"
    );
}

#[test]
fn join_using() {
    let mut s = select(["p1.*"]);
    s.add_columns_quoted_alias(["p2.name", "p2Name", "p2.email", "p2Email"])
        .from(alias("dbr_people", "p1"))
        .join_using(JoinKind::Right, alias("dbr_people", "p2"), ["id", "email"]);
    assert_eq!(
        s.to_sql().unwrap().0,
        "SELECT p1.*, `p2`.`name` AS `p2Name`, `p2`.`email` AS `p2Email` FROM `dbr_people` AS `p1` RIGHT JOIN `dbr_people` AS `p2` USING (`id`,`email`)"
    );
}

#[test]
fn locks() {
    let mut s = select(["p1.*"]);
    s.add_columns_quoted_alias(["p2.name", "p2Name", "p2.email", "p2Email"])
        .from(alias("dbr_people", "p1"))
        .lock_in_share_mode();
    assert_eq!(
        s.to_sql().unwrap().0,
        "SELECT p1.*, `p2`.`name` AS `p2Name`, `p2`.`email` AS `p2Email` FROM `dbr_people` AS `p1` LOCK IN SHARE MODE"
    );

    s.for_update();
    assert!(s.to_sql().unwrap().0.ends_with("FROM `dbr_people` AS `p1` FOR UPDATE"));
}

// ==================== listeners ====================

#[test]
fn listener_stop_propagation() {
    let mut s = select(["a", "b"]);
    s.from(alias("tableA", "tA")).order_by(["col3"]);
    s.listeners
        .add(Listen::before_to_sql("listener1", |s: &mut Select| {
            s.order_by_desc(["col1"]);
        }))
        .add(Listen::before_to_sql("listener2", |s: &mut Select| {
            s.order_by_desc(["col2"]).stop_propagation();
        }))
        .add(Listen::before_to_sql("listener3", |_: &mut Select| {
            panic!("must not be called")
        }));

    assert_eq!(
        s.to_sql().unwrap().0,
        "SELECT a, b FROM `tableA` AS `tA` ORDER BY col3, col1 DESC, col2 DESC"
    );
    assert_eq!(
        s.to_sql().unwrap().0,
        "SELECT a, b FROM `tableA` AS `tA` ORDER BY col3, col1 DESC, col2 DESC, col1 DESC, col2 DESC"
    );
}

#[test]
fn listener_missing_event_type() {
    let mut s = select(["a", "b"]);
    s.from(alias("tableA", "tA")).order_by(["col3"]);
    s.listeners.add(Listen::new("a col1", |s: &mut Select| {
        s.order_by_desc(["col1"]);
    }));
    assert!(s.to_sql().unwrap_err().is_empty());
}

#[test]
fn listener_once_and_always() {
    let mut s = select(["a", "b"]);
    s.from(alias("tableA", "tA")).order_by(["col3"]);
    s.listeners
        .add(
            Listen::before_to_sql("a col1", |s: &mut Select| {
                s.where_([Condition::raw_args("a=?", [arg(1.5)])])
                    .order_by_desc(["col1"]);
            })
            .once(),
        )
        .add(Listen::before_to_sql("b col2", |s: &mut Select| {
            s.order_by_desc(["col2"])
                .where_([Condition::raw_args("b=?", [arg("a")])]);
        }));

    let (sql, args) = s.to_sql().unwrap();
    assert_eq!(
        sql,
        "SELECT a, b FROM `tableA` AS `tA` WHERE (a=?) AND (b=?) ORDER BY col3, col1 DESC, col2 DESC"
    );
    assert_eq!(args, vec![Value::Float(1.5), Value::String("a".into())]);
    // once listeners leave the registry after they fire
    assert_eq!(s.listeners.to_string(), "b col2");

    let (sql, args) = s.to_sql().unwrap();
    assert_eq!(
        sql,
        "SELECT a, b FROM `tableA` AS `tA` WHERE (a=?) AND (b=?) AND (b=?) ORDER BY col3, col1 DESC, col2 DESC, col2 DESC"
    );
    assert_eq!(
        args,
        vec![
            Value::Float(1.5),
            Value::String("a".into()),
            Value::String("a".into()),
        ]
    );
}

#[test]
fn listener_names_display() {
    let mut s = select(["a"]);
    s.listeners
        .add(Listen::before_to_sql("a col1", |_: &mut Select| {}))
        .add(Listen::before_to_sql("b col2", |_: &mut Select| {}));
    assert_eq!(s.listeners.to_string(), "a col1; b col2");
}

// ==================== columns ====================

#[test]
fn add_columns_splits() {
    let mut s = select(["a", "b"]);
    s.from(alias("tableA", "tA"))
        .add_columns(["d,e, f", "g", "h", "i,j ,k"]);
    assert_eq!(
        s.to_sql().unwrap().0,
        "SELECT a, b, d, e, f, g, h, i, j, k FROM `tableA` AS `tA`"
    );
}

#[test]
fn add_columns_expr_alias() {
    let mut s = Select::default();
    s.from("t3")
        .add_columns_expr_alias(["x", "u", "y", "v"])
        .add_columns_expr_alias(["SUM(price)", "total_price"]);
    assert_eq!(
        s.to_sql().unwrap().0,
        "SELECT x AS `u`, y AS `v`, SUM(price) AS `total_price` FROM `t3`"
    );
}

#[test]
fn add_columns_quoted() {
    let mut s = Select::default();
    s.from("t3")
        .add_columns_quoted(["t3.name", "sku"])
        .add_columns_expr_alias(["SUM(price)", "total_price"]);
    assert_eq!(
        s.to_sql().unwrap().0,
        "SELECT `t3`.`name`, `sku`, SUM(price) AS `total_price` FROM `t3`"
    );
}

#[test]
fn add_columns_quoted_alias_layouts() {
    let layouts: [&[&str]; 3] = [
        &["t3.name", "t3Name", "t3.sku,t3SKU"],
        &["t3.name", "t3Name,t3.sku", "t3SKU"],
        &["t3.name,t3Name,t3.sku,t3SKU"],
    ];
    for layout in layouts {
        let mut s = Select::default();
        s.from("t3").add_columns_quoted_alias(layout.iter().copied());
        assert_eq!(
            s.to_sql().unwrap().0,
            "SELECT `t3`.`name` AS `t3Name`, `t3`.`sku` AS `t3SKU` FROM `t3`"
        );
    }
}

// ==================== sub-selects ====================

fn category_products() -> Select {
    let mut sub = Select::default();
    sub.from("catalog_category_product")
        .add_columns_quoted(["entity_id"])
        .where_([Condition::column("category_id", arg(234i64))]);
    sub
}

#[test]
fn sub_select_operators() {
    let cases = [
        (Operator::In, "IN"),
        (Operator::Exists, "EXISTS"),
        (Operator::NotExists, "NOT EXISTS"),
        (Operator::NotEqual, "!="),
        (Operator::Equal, "="),
    ];
    for (op, rendered) in cases {
        let mut s = select(["*"]);
        s.from("catalog_product_entity")
            .where_([Condition::sub_select("entity_id", op, category_products())]);
        let (sql, args) = s.to_sql().unwrap();
        assert_eq!(
            sql,
            format!(
                "SELECT * FROM `catalog_product_entity` WHERE (`entity_id` {rendered} (SELECT `entity_id` FROM `catalog_category_product` WHERE (`category_id` = ?)))"
            )
        );
        assert_eq!(args, ints(&[234]));
    }
}

fn bestsellers(with_args: bool) -> Select {
    let mut sel3 = Select::default();
    sel3.from(alias("sales_bestsellers_aggregated_daily", "t3"))
        .add_columns_expr_alias(["DATE_FORMAT(t3.period, '%Y-%m-01')", "period"])
        .add_columns(["`t3`.`store_id`,`t3`.`product_id`,`t3`.`product_name`"])
        .add_columns_expr_alias([
            "AVG(`t3`.`product_price`)",
            "avg_price",
            "SUM(t3.qty_ordered)",
            "total_qty",
        ])
        .group_by([
            "`t3`.`store_id`",
            "DATE_FORMAT(t3.period, '%Y-%m-01')",
            "`t3`.`product_id`",
            "`t3`.`product_name`",
        ])
        .order_by([
            "`t3`.`store_id`",
            "DATE_FORMAT(t3.period, '%Y-%m-01')",
            "`total_qty` DESC",
        ]);
    if with_args {
        sel3.having([Condition::expr("COUNT(*)>?", [arg(3)])])
            .where_([Condition::expr(
                "t3.store_id",
                [Argument::int64s([2, 3, 4]).operator(Operator::In)],
            )]);
    }

    let mut sel2 = Select::from_sub(sel3, "t2");
    sel2.add_columns(["`t2`.`period`,`t2`.`store_id`,`t2`.`product_id`,`t2`.`product_name`,`t2`.`avg_price`"])
        .add_columns_expr_alias(["`t2`.`total_qty`", "`qty_ordered`"]);

    let mut sel1 = Select::from_sub(sel2, "t1");
    sel1.add_columns(["`t1`.`period`,`t1`.`store_id`,`t1`.`product_id`,`t1`.`product_name`,`t1`.`avg_price`,`t1`.`qty_ordered`"])
        .order_by(["`t1`.period", "`t1`.product_id"]);
    sel1
}

#[test]
fn nested_from_sub_without_args() {
    let (sql, args) = bestsellers(false).to_sql().unwrap();
    assert!(args.is_empty());
    assert_eq!(
        sql,
        "SELECT `t1`.`period`, `t1`.`store_id`, `t1`.`product_id`, `t1`.`product_name`, `t1`.`avg_price`, `t1`.`qty_ordered` FROM (SELECT `t2`.`period`, `t2`.`store_id`, `t2`.`product_id`, `t2`.`product_name`, `t2`.`avg_price`, `t2`.`total_qty` AS `qty_ordered` FROM (SELECT DATE_FORMAT(t3.period, '%Y-%m-01') AS `period`, `t3`.`store_id`, `t3`.`product_id`, `t3`.`product_name`, AVG(`t3`.`product_price`) AS `avg_price`, SUM(t3.qty_ordered) AS `total_qty` FROM `sales_bestsellers_aggregated_daily` AS `t3` GROUP BY `t3`.`store_id`, DATE_FORMAT(t3.period, '%Y-%m-01'), `t3`.`product_id`, `t3`.`product_name` ORDER BY `t3`.`store_id`, DATE_FORMAT(t3.period, '%Y-%m-01'), `total_qty` DESC) AS `t2`) AS `t1` ORDER BY `t1`.period, `t1`.product_id"
    );
}

#[test]
fn nested_from_sub_with_args() {
    let (sql, args) = bestsellers(true).to_sql().unwrap();
    assert_eq!(args, ints(&[2, 3, 4, 3]));
    assert_eq!(
        sql,
        "SELECT `t1`.`period`, `t1`.`store_id`, `t1`.`product_id`, `t1`.`product_name`, `t1`.`avg_price`, `t1`.`qty_ordered` FROM (SELECT `t2`.`period`, `t2`.`store_id`, `t2`.`product_id`, `t2`.`product_name`, `t2`.`avg_price`, `t2`.`total_qty` AS `qty_ordered` FROM (SELECT DATE_FORMAT(t3.period, '%Y-%m-01') AS `period`, `t3`.`store_id`, `t3`.`product_id`, `t3`.`product_name`, AVG(`t3`.`product_price`) AS `avg_price`, SUM(t3.qty_ordered) AS `total_qty` FROM `sales_bestsellers_aggregated_daily` AS `t3` WHERE (`t3`.`store_id` IN ?) GROUP BY `t3`.`store_id`, DATE_FORMAT(t3.period, '%Y-%m-01'), `t3`.`product_id`, `t3`.`product_name` HAVING (COUNT(*)>?) ORDER BY `t3`.`store_id`, DATE_FORMAT(t3.period, '%Y-%m-01'), `total_qty` DESC) AS `t2`) AS `t1` ORDER BY `t1`.period, `t1`.product_id"
    );
}

#[test]
fn inner_listener_fires_during_outer_compile() {
    let mut sub = category_products();
    sub.listeners.add(Listen::before_to_sql("limit", |s: &mut Select| {
        s.limit(1);
    }));
    let mut s = select(["*"]);
    s.from("catalog_product_entity")
        .where_([Condition::sub_select("entity_id", Operator::Equal, sub)]);
    assert!(s.to_sql().unwrap().0.ends_with("WHERE (`category_id` = ?) LIMIT 1))"));
}

// ==================== parenthesis markers ====================

#[test]
fn parenthesis_at_start() {
    let mut s = select(["a", "b"]);
    s.from(alias("c", "cc"))
        .where_([
            Condition::parenthesis_open(),
            Condition::column("d", arg(1)),
            Condition::column("e", arg("wat")).or(),
            Condition::parenthesis_close(),
            Condition::column("f", arg(2.5)),
        ])
        .group_by(["ab"])
        .having([
            Condition::parenthesis_open(),
            Condition::column("m", arg(33)),
            Condition::column("n", arg("wh3r3")).or(),
            Condition::parenthesis_close(),
            Condition::raw("j = k"),
        ]);
    let (sql, args) = s.to_sql().unwrap();
    assert_eq!(
        sql,
        "SELECT a, b FROM `c` AS `cc` WHERE ((`d` = ?) OR (`e` = ?)) AND (`f` = ?) GROUP BY ab HAVING ((`m` = ?) OR (`n` = ?)) AND (j = k)"
    );
    assert_eq!(
        args,
        vec![
            Value::Int(1),
            Value::String("wat".into()),
            Value::Float(2.5),
            Value::Int(33),
            Value::String("wh3r3".into()),
        ]
    );
}

#[test]
fn parenthesis_at_end() {
    let mut s = select(["a", "b"]);
    s.from(alias("c", "cc"))
        .where_([
            Condition::column("f", arg(2.5)),
            Condition::parenthesis_open(),
            Condition::column("d", arg(1)),
            Condition::column("e", arg("wat")).or(),
            Condition::parenthesis_close(),
        ])
        .group_by(["ab"])
        .having([
            Condition::raw("j = k"),
            Condition::parenthesis_open(),
            Condition::column("m", arg(33)),
            Condition::column("n", arg("wh3r3")).or(),
            Condition::parenthesis_close(),
        ]);
    assert_eq!(
        s.to_sql().unwrap().0,
        "SELECT a, b FROM `c` AS `cc` WHERE (`f` = ?) AND ((`d` = ?) OR (`e` = ?)) GROUP BY ab HAVING (j = k) AND ((`m` = ?) OR (`n` = ?))"
    );
}

#[test]
fn parenthesis_in_middle() {
    let mut s = select(["a", "b"]);
    s.from(alias("c", "cc"))
        .where_([
            Condition::column("f", arg(2.5)),
            Condition::parenthesis_open(),
            Condition::column("d", arg(1)),
            Condition::column("e", arg("wat")).or(),
            Condition::parenthesis_close(),
            Condition::column("p", arg(1.25)),
        ])
        .group_by(["ab"])
        .having([
            Condition::raw("j = k"),
            Condition::parenthesis_open(),
            Condition::column("m", arg(33)),
            Condition::column("n", arg("wh3r3")).or(),
            Condition::parenthesis_close(),
            Condition::column("q", Argument::not_null()),
        ]);
    assert_eq!(
        s.to_sql().unwrap().0,
        "SELECT a, b FROM `c` AS `cc` WHERE (`f` = ?) AND ((`d` = ?) OR (`e` = ?)) AND (`p` = ?) GROUP BY ab HAVING (j = k) AND ((`m` = ?) OR (`n` = ?)) AND (`q` IS NOT NULL)"
    );
}

#[test]
fn unbalanced_parenthesis() {
    let mut s = select(["a"]);
    s.from("b").where_([
        Condition::parenthesis_open(),
        Condition::column("c", arg(1)),
    ]);
    assert!(s.to_sql().unwrap_err().is_validation());
}

// ==================== options ====================

#[test]
fn custom_quote_character() {
    let mut s = select(["a"]).with_options(Options::new().with_quote('"'));
    s.from(alias("b", "bb")).where_([Condition::column("c.d", arg(1))]);
    assert_eq!(
        s.to_sql().unwrap().0,
        r#"SELECT a FROM "b" AS "bb" WHERE ("c"."d" = ?)"#
    );
}

#[test]
fn interpolated_nested_select() {
    // nested statements render with the options of the statement being compiled
    let mut s = bestsellers(true).with_options(Options::new().with_interpolate(true));
    let (sql, args) = s.to_sql().unwrap();
    assert!(sql.contains("WHERE (`t3`.`store_id` IN (2,3,4))"));
    assert!(sql.contains("HAVING (COUNT(*)>3)"));
    assert!(args.is_empty());

    let mut sub = category_products().with_options(Options::new().with_interpolate(true));
    let (sql, args) = sub.to_sql().unwrap();
    assert_eq!(
        sql,
        "SELECT `entity_id` FROM `catalog_category_product` WHERE (`category_id` = 234)"
    );
    assert!(args.is_empty());
}

#[test]
fn in_lists_keep_null_entries() {
    let build = |opts: Options| {
        let mut s = select(["id"]).with_options(opts);
        s.from("d").where_([
            Condition::column(
                "a",
                Argument::list([Some("x"), None, Some("y")]).operator(Operator::NotIn),
            ),
            Condition::column(
                "b",
                Argument::list([None, Some(7i64)]).operator(Operator::In),
            ),
        ]);
        s
    };

    let (sql, args) = build(Options::default()).to_sql().unwrap();
    assert_eq!(
        sql,
        "SELECT id FROM `d` WHERE (`a` NOT IN (?,NULL,?)) AND (`b` IN (NULL,?))"
    );
    assert_eq!(
        args,
        vec![
            Value::String("x".into()),
            Value::String("y".into()),
            Value::Int(7)
        ]
    );

    let (sql, args) = build(Options::new().with_interpolate(true))
        .to_sql()
        .unwrap();
    assert_eq!(
        sql,
        "SELECT id FROM `d` WHERE (`a` NOT IN ('x',NULL,'y')) AND (`b` IN (NULL,7))"
    );
    assert!(args.is_empty());
}

#[test]
fn non_finite_floats_bind_but_never_inline() {
    let build = |opts: Options| {
        let mut s = select(["id"]).with_options(opts);
        s.from("prices")
            .where_([Condition::column("p", arg(f64::NAN))]);
        s
    };

    let (sql, args) = build(Options::default()).to_sql().unwrap();
    assert_eq!(sql, "SELECT id FROM `prices` WHERE (`p` = ?)");
    assert!(matches!(args.as_slice(), [Value::Float(f)] if f.is_nan()));

    let err = build(Options::new().with_interpolate(true))
        .to_sql()
        .unwrap_err();
    assert!(err.is_validation());

    let mut s = select(["id"]).with_options(Options::new().with_interpolate(true));
    s.from("prices")
        .where_([Condition::column("q", arg(f64::INFINITY))]);
    assert!(s.to_sql().unwrap_err().is_validation());
}
