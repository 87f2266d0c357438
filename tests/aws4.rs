//! Signatures from the AWS SigV4 test suite, plus DynamoDB and Translate requests.
use {
    chrono::{DateTime, Utc},
    http::Method,
    sigv4_request_signer::{
        Credentials, JsonTargetService, RequestDescriptor, SigV4Signer, SignedRequest, APPLICATION_X_AMZ_JSON_1_1,
        SIGN_ALL_HEADERS,
    },
};

const ACCESS_KEY: &str = "AKIDEXAMPLE";
const SECRET_KEY: &str = "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY";
const REGION: &str = "us-east-1";
const SERVICE: &str = "service";

/// 2015-08-30T12:36:00Z
fn test_timestamp() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(1440938160, 0).unwrap()
}

fn sign_suite_request(
    method: Method,
    path: &str,
    query: &[(&str, &str)],
    headers: &[(&str, &str)],
    payload: &'static [u8],
) -> SignedRequest {
    let mut builder = RequestDescriptor::builder();
    builder.method(method).path(path).header("Host", "example.amazonaws.com").payload(payload);
    for (key, value) in query {
        builder.query_param(*key, *value);
    }
    for (name, value) in headers {
        builder.header(*name, *value);
    }
    let descriptor = builder.build().unwrap();

    let signer = SigV4Signer::new(REGION, SERVICE);
    signer.sign(&descriptor, &Credentials::new(ACCESS_KEY, SECRET_KEY), test_timestamp(), &SIGN_ALL_HEADERS).unwrap()
}

fn run(
    method: Method,
    path: &str,
    query: &[(&str, &str)],
    headers: &[(&str, &str)],
    payload: &'static [u8],
    signed_headers: &str,
    signature: &str,
) {
    let signed = sign_suite_request(method, path, query, headers, payload);
    assert_eq!(signed.signed_headers(), signed_headers);
    assert_eq!(signed.signature(), signature);
    assert_eq!(
        signed.authorization(),
        format!(
            "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20150830/us-east-1/service/aws4_request, SignedHeaders={}, Signature={}",
            signed_headers, signature
        )
    );
}

#[test_log::test]
fn get_vanilla() {
    let signed = sign_suite_request(Method::GET, "/", &[], &[], b"");
    assert_eq!(
        signed.canonical_request(),
        "GET\n/\n\nhost:example.amazonaws.com\nx-amz-date:20150830T123600Z\n\nhost;x-amz-date\ne3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
    );
    assert_eq!(
        signed.string_to_sign(),
        "AWS4-HMAC-SHA256\n20150830T123600Z\n20150830/us-east-1/service/aws4_request\nbb579772317eb040ac9ed261061d46c1f17a8133879d6129b6e1c25292927e63"
    );
    assert_eq!(
        signed.authorization(),
        "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20150830/us-east-1/service/aws4_request, SignedHeaders=host;x-amz-date, Signature=5fa00fa31553b73ebf1942676e86291e8372ff2a2260956d9b8aae1d763fbf31"
    );
}

#[test_log::test]
fn get_vanilla_query_order_key() {
    let signed = sign_suite_request(Method::GET, "/", &[("Param2", "value2"), ("Param1", "value1")], &[], b"");
    assert!(signed.canonical_request().starts_with("GET\n/\nParam1=value1&Param2=value2\n"));
    assert_eq!(signed.signature(), "b97d918cfa904a5beff61c982a1b6f458b799221646efd99d3219ec94cdf2500");
}

#[test_log::test]
fn get_vanilla_query_order_value() {
    run(
        Method::GET,
        "/",
        &[("Param1", "value2"), ("Param1", "Value1")],
        &[],
        b"",
        "host;x-amz-date",
        "eedbc4e291e521cf13422ffca22be7d2eb8146eecf653089df300a15b2382bd1",
    );
}

#[test_log::test]
fn get_vanilla_empty_query_key() {
    run(
        Method::GET,
        "/",
        &[("Param1", "value1")],
        &[],
        b"",
        "host;x-amz-date",
        "a67d582fa61cc504c4bae71f336f98b97f1ea3c7a6bfe1b6e45aec72011b9aeb",
    );
}

#[test_log::test]
fn get_vanilla_query_unreserved() {
    let unreserved = "-._~0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
    run(
        Method::GET,
        "/",
        &[(unreserved, unreserved)],
        &[],
        b"",
        "host;x-amz-date",
        "9c3e54bfcdf0b19771a7f523ee5669cdf59bc7cc0884027167c21bb143a40197",
    );
}

#[test_log::test]
fn get_vanilla_utf8_query() {
    run(
        Method::GET,
        "/",
        &[("ሴ", "bar")],
        &[],
        b"",
        "host;x-amz-date",
        "2cdec8eed098649ff3a119c94853b13c643bcf08f8b0a1d91e12c9027818dd04",
    );
}

#[test_log::test]
fn get_utf8() {
    run(
        Method::GET,
        "/%E1%88%B4",
        &[],
        &[],
        b"",
        "host;x-amz-date",
        "8318018e0b0f223aa2bbf98705b62bb787dc9c0e678f255a891fd03141be5d85",
    );
}

#[test_log::test]
fn get_header_value_trim() {
    run(
        Method::GET,
        "/",
        &[],
        &[("My-Header1", " value1"), ("My-Header2", " \"a   b   c\"")],
        b"",
        "host;my-header1;my-header2;x-amz-date",
        "acc3ed3afb60bb290fc8d2dd0098b9911fcaa05412b367055dee359757a9c736",
    );
}

#[test_log::test]
fn normalize_path_get_relative_relative() {
    run(
        Method::GET,
        "/example1/example2/../..",
        &[],
        &[],
        b"",
        "host;x-amz-date",
        "5fa00fa31553b73ebf1942676e86291e8372ff2a2260956d9b8aae1d763fbf31",
    );
}

#[test_log::test]
fn normalize_path_get_slashes() {
    run(
        Method::GET,
        "//example//",
        &[],
        &[],
        b"",
        "host;x-amz-date",
        "9a624bd73a37c9a373b5312afbebe7a714a789de108f0bdfe846570885f57e84",
    );
}

#[test_log::test]
fn normalize_path_get_space() {
    run(
        Method::GET,
        "/example space/",
        &[],
        &[],
        b"",
        "host;x-amz-date",
        "652487583200325589f1fba4c7e578f72c47cb61beeca81406b39ddec1366741",
    );
}

#[test_log::test]
fn post_vanilla() {
    run(
        Method::POST,
        "/",
        &[],
        &[],
        b"",
        "host;x-amz-date",
        "5da7c1a2acd57cee7505fc6676e4e544621c30862966e37dddb68e92efbe5d6b",
    );
}

#[test_log::test]
fn post_header_key_sort() {
    run(
        Method::POST,
        "/",
        &[],
        &[("My-Header1", "value1")],
        b"",
        "host;my-header1;x-amz-date",
        "c5410059b04c1ee005303aed430f6e6645f61f4dc9e1461ec8f8916fdf18852c",
    );
}

#[test_log::test]
fn post_x_www_form_urlencoded() {
    run(
        Method::POST,
        "/",
        &[],
        &[("Content-Type", "application/x-www-form-urlencoded; charset=utf8")],
        b"Param1=value1",
        "content-type;host;x-amz-date",
        "1a72ec8f64bd914b0e42e42607c7fbce7fb2c7465f63e3092b3b0d39fa77a6fe",
    );
}

#[test_log::test]
fn post_sts_header_before() {
    const TOKEN: &str = "AQoDYXdzEPT//////////wEXAMPLEtc764bNrC9SAPBSM22wDOk4x4HIZ8j4FZTwdQWLWsKWHGBuFqwAeMicRXmxfpSPfIeoIYRqTflfKD8YUuwthAx7mSEI/qkPpKPi/kMcGdQrmGdeehM4IC1NtBmUpp2wUE8phUZampKsburEDy0KPkyQDYwT7WZ0wq5VSXDvp75YU9HFvlRd8Tx6q6fE8YQcHNVXAkiY9q6d+xo0rKwT38xVqr7ZD0u0iPPkUL64lIZbqBAz+scqKmlzm8FDrypNC9Yjc8fPOLn9FX9KSYvKTr4rvx3iSIlTJabIQwj2ICCR/oLxBA==";

    let descriptor =
        RequestDescriptor::builder().method(Method::POST).header("Host", "example.amazonaws.com").build().unwrap();
    let credentials = Credentials::new(ACCESS_KEY, SECRET_KEY).with_session_token(TOKEN);
    let signed = SigV4Signer::new(REGION, SERVICE)
        .sign(&descriptor, &credentials, test_timestamp(), &SIGN_ALL_HEADERS)
        .unwrap();

    assert_eq!(signed.signed_headers(), "host;x-amz-date;x-amz-security-token");
    assert_eq!(signed.signature(), "85d96828115b5dc0cfc3bd16ad9e210dd772bbebba041836c64533a82be05ead");
    assert_eq!(signed.header("x-amz-security-token"), Some(TOKEN));
}

const DYNAMODB_CREATE_TABLE: &str = r#"{"KeySchema": [{"KeyType": "HASH","AttributeName": "Id"}],"TableName": "TestTable","AttributeDefinitions": [{"AttributeName": "Id","AttributeType": "S"}],"ProvisionedThroughput": {"WriteCapacityUnits": 5,"ReadCapacityUnits": 5}}"#;

#[test_log::test]
fn dynamodb_create_table() {
    let dynamodb = JsonTargetService::builder()
        .service("dynamodb")
        .region("us-west-2")
        .target_prefix("DynamoDB_20120810")
        .build()
        .unwrap();
    let credentials = Credentials::new(ACCESS_KEY, SECRET_KEY);
    let (descriptor, signed) =
        dynamodb.sign("CreateTable", DYNAMODB_CREATE_TABLE, &credentials, test_timestamp()).unwrap();

    assert_eq!(signed.payload_sha256(), "9600e999334d0737f3ba82c11950b30b85ebe97e2ca8345e082283240d4a8368");
    assert_eq!(
        signed.canonical_request(),
        "POST\n/\n\ncontent-type:application/x-amz-json-1.0\nhost:dynamodb.us-west-2.amazonaws.com\nx-amz-date:20150830T123600Z\nx-amz-target:DynamoDB_20120810.CreateTable\n\ncontent-type;host;x-amz-date;x-amz-target\n9600e999334d0737f3ba82c11950b30b85ebe97e2ca8345e082283240d4a8368"
    );
    assert_eq!(
        signed.string_to_sign(),
        "AWS4-HMAC-SHA256\n20150830T123600Z\n20150830/us-west-2/dynamodb/aws4_request\n60b61b176dd050a2e70d0805c68cc12ddbf7299960057e93d1ac24a13575be77"
    );
    assert_eq!(
        signed.authorization(),
        "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20150830/us-west-2/dynamodb/aws4_request, SignedHeaders=content-type;host;x-amz-date;x-amz-target, Signature=b2cb20e6581cc9d8709cc4ca03cc55cde3abf28c2cad5e39f2b9e43b48cc5d82"
    );
    assert_eq!(
        signed.headers().iter().map(|(name, value)| (*name, value.as_str())).take(3).collect::<Vec<_>>(),
        vec![
            ("content-type", "application/x-amz-json-1.0"),
            ("x-amz-target", "DynamoDB_20120810.CreateTable"),
            ("x-amz-date", "20150830T123600Z"),
        ]
    );
    signed.check_body(descriptor.payload()).unwrap();
}

#[test_log::test]
fn translate_text() {
    let translate = JsonTargetService::builder()
        .service("translate")
        .region("us-west-2")
        .content_type(APPLICATION_X_AMZ_JSON_1_1)
        .target_prefix("AWSShineFrontendService_20170701")
        .build()
        .unwrap();
    let payload = r#"{"Text": "Hello world.","SourceLanguageCode": "en","TargetLanguageCode": "de"}"#;
    let credentials = Credentials::new(ACCESS_KEY, SECRET_KEY);
    let (_, signed) = translate.sign("TranslateText", payload, &credentials, test_timestamp()).unwrap();

    assert_eq!(signed.payload_sha256(), "58bd40fa2d95d4710184aab55de9753653d572d639d3fce588fa4fa5c0e16dbf");
    assert!(signed.string_to_sign().ends_with("\n60b5e94c559e79c13df87ef652caa1296d284cbbb74adb913333abd27c273892"));
    assert_eq!(signed.signature(), "faa65bd29467cfd57b05d769ca78ad0d151df463437f7ef2a84ad5aa8b81bf20");
}

#[test_log::test]
fn dynamodb_payload_avalanche() {
    let dynamodb = JsonTargetService::builder()
        .service("dynamodb")
        .region("us-west-2")
        .target_prefix("DynamoDB_20120810")
        .build()
        .unwrap();
    let credentials = Credentials::new(ACCESS_KEY, SECRET_KEY);
    let changed = DYNAMODB_CREATE_TABLE.replace("TestTable", "TestTablf");
    let (_, signed) = dynamodb.sign("CreateTable", changed, &credentials, test_timestamp()).unwrap();

    assert_eq!(signed.signature(), "72b34f66c837e3e796ea44b69c04ee1ca64174423f398c36428ef4289cd9b9b0");
    assert_ne!(signed.signature(), "b2cb20e6581cc9d8709cc4ca03cc55cde3abf28c2cad5e39f2b9e43b48cc5d82");
}
