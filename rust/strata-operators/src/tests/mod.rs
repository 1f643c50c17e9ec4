mod positional_scan_property_tests;
