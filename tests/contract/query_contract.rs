use getprices_core::query::{GETPRICES_URL, YAHOO_QUOTES_URL};
use getprices_core::{
    build_request_url, yahoo_quotes_url, Period, PriceQuery, Symbol, ValidationError,
};

fn symbol(value: &str) -> Symbol {
    Symbol::parse(value).expect("valid symbol")
}

#[test]
fn request_url_parameters_follow_a_fixed_order() {
    let query = PriceQuery::new(symbol("ibm"))
        .with_columns(["c", "v"])
        .expect("valid columns")
        .with_exchange("NYSE")
        .expect("valid exchange")
        .with_period(Period::years(1))
        .with_interval(3600)
        .expect("valid interval");

    assert_eq!(
        build_request_url(GETPRICES_URL, &query),
        "https://www.google.com/finance/getprices?q=IBM&i=3600&p=1Y&x=NYSE&f=c,v"
    );
}

#[test]
fn request_url_is_deterministic() {
    let query = PriceQuery::new(symbol(".inx")).with_period(Period::days(30));

    let first = build_request_url(GETPRICES_URL, &query);
    let second = build_request_url(GETPRICES_URL, &query.clone());

    assert_eq!(first, second);
    assert_eq!(first, "https://www.google.com/finance/getprices?q=.INX&i=86400&p=30d");
}

#[test]
fn each_optional_parameter_is_omitted_when_unset() {
    let bare = PriceQuery::new(symbol("GOOG")).without_interval();
    let url = build_request_url(GETPRICES_URL, &bare);

    for key in ["&i=", "&p=", "&x=", "&f="] {
        assert!(!url.contains(key), "{key} should be absent from {url}");
    }
}

#[test]
fn invalid_parameters_are_rejected_before_any_url_is_built() {
    let query = PriceQuery::new(symbol("GOOG"));

    assert!(matches!(
        query.clone().with_columns(["c", "v&x=1"]),
        Err(ValidationError::InvalidColumn { .. })
    ));
    assert!(matches!(
        "30 days".parse::<Period>(),
        Err(ValidationError::InvalidPeriod { .. })
    ));
    assert!(matches!(
        Symbol::parse("GOOG?q=1"),
        Err(ValidationError::SymbolInvalidChar { .. })
    ));
}

#[test]
fn yahoo_quotes_url_lists_every_symbol() {
    let url = yahoo_quotes_url(
        YAHOO_QUOTES_URL,
        &[symbol("aapl"), symbol("goog"), symbol("msft")],
        &["n", "l1"],
    )
    .expect("valid url");

    assert_eq!(
        url,
        "http://finance.yahoo.com/d/quotes.csv?s=AAPL,GOOG,MSFT&f=nl1"
    );
}
