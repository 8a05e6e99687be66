pub mod curl_parser;
