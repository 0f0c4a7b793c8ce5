use std::collections::HashSet;

use dbr::{
    Argument, Arguments, Condition, Listen, Operator, Options, Select, Value, alias, arg, interpolate,
};

#[test]
fn clones_are_independent() {
    let mut base = Select::new(["a"]);
    base.from("t").where_([Condition::column("b", arg(1))]);

    let mut copy = base.clone();
    copy.where_([Condition::column("c", arg(2))])
        .order_by(["a"])
        .add_columns(["d"]);

    assert_eq!(base.to_sql().unwrap().0, "SELECT a FROM `t` WHERE (`b` = ?)");
    assert_eq!(
        copy.to_sql().unwrap().0,
        "SELECT a, d FROM `t` WHERE (`b` = ?) AND (`c` = ?) ORDER BY a"
    );
}

#[test]
fn compiling_twice_without_listeners_is_stable() {
    let mut sub = Select::new(["x"]);
    sub.from("inner").where_([Condition::column("y", arg(2))]);
    let mut s = Select::from_sub(sub, "t");
    s.add_columns(["x"])
        .where_([Condition::column("x", Argument::int64s([3, 4]).operator(Operator::In))]);

    let first = s.to_sql().unwrap();
    assert_eq!(first, s.to_sql().unwrap());
    assert_eq!(
        first.0,
        "SELECT x FROM (SELECT x FROM `inner` WHERE (`y` = ?)) AS `t` WHERE (`x` IN ?)"
    );
    assert_eq!(first.1, vec![Value::Int(2), Value::Int(3), Value::Int(4)]);
}

#[test]
fn cloned_listeners_mutate_only_their_statement() {
    let mut base = Select::new(["a"]);
    base.from("t");
    base.listeners
        .add(Listen::before_to_sql("order", |s: &mut Select| {
            s.order_by(["a"]);
        }));
    let mut copy = base.clone();

    copy.to_sql().unwrap();
    copy.to_sql().unwrap();
    assert_eq!(base.to_sql().unwrap().0, "SELECT a FROM `t` ORDER BY a");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn parallel_compiles_from_shared_template() {
    let template = Options::new().with_log_sql(false);

    let mut handles = Vec::new();
    for i in 0..64i64 {
        let opts = template.clone();
        handles.push(tokio::spawn(async move {
            let mut s = Select::new(["id"]).with_options(opts);
            s.from(alias("items", "i")).where_([
                Condition::column("i.owner", arg(i)),
                Condition::column("i.tag", Argument::int64s([i, i + 1]).operator(Operator::In)),
            ]);
            s.listeners
                .add(Listen::before_to_sql("limit", move |s: &mut Select| {
                    s.limit(i as u64 + 1);
                }));
            s.to_sql()
        }));
    }

    let mut seen = HashSet::new();
    for (i, handle) in handles.into_iter().enumerate() {
        let (sql, args) = handle.await.unwrap().unwrap();
        let i = i as i64;
        assert_eq!(
            sql,
            format!(
                "SELECT id FROM `items` AS `i` WHERE (`i`.`owner` = ?) AND (`i`.`tag` IN ?) LIMIT {}",
                i + 1
            )
        );
        assert_eq!(args, vec![Value::Int(i), Value::Int(i), Value::Int(i + 1)]);
        seen.insert(sql);
    }
    assert_eq!(seen.len(), 64);
}

#[test]
fn standalone_interpolation() {
    let args: Arguments = [
        arg(1),
        arg("it's"),
        Argument::int64s([2, 3]).operator(Operator::In),
        Argument::int64s([4, 5]).operator(Operator::Between),
    ]
    .into_iter()
    .collect();
    let sql = interpolate(
        "SELECT * FROM t WHERE a = ? AND b = ? AND c IN ? AND d BETWEEN ? AND ? AND e = '?'",
        &args,
    )
    .unwrap();
    assert_eq!(
        sql,
        r"SELECT * FROM t WHERE a = 1 AND b = 'it\'s' AND c IN (2,3) AND d BETWEEN 4 AND 5 AND e = '?'"
    );
}

#[test]
fn null_value_json_encoding() {
    let values = vec![
        Value::Null,
        Value::Int(3),
        Value::String("x".into()),
        Value::Bool(true),
    ];
    let json = serde_json::to_string(&values).unwrap();
    assert_eq!(json, r#"[null,3,"x",true]"#);
    let back: Vec<Value> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, values);
}
