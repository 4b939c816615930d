mod epics_test;
mod support;
